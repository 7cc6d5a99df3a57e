// =============================================================================
// Market Structure & Support / Resistance
// =============================================================================
//
// Structure compares the two most recent swing highs and the two most recent
// swing lows:
//
//   highs up   + lows up    => UPTREND
//   highs down + lows down  => DOWNTREND
//   highs down + lows up    => CONVERGING
//   highs up   + lows down  => EXPANDING
//   anything else           => RANGE-BOUND
//
// Fewer than two swing highs or two swing lows reads as range-bound.

use serde::{Deserialize, Serialize};

use super::swing::SwingPoint;
use crate::types::Sentiment;

/// Classification of recent price structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStructure {
    Uptrend,
    Downtrend,
    Converging,
    Expanding,
    RangeBound,
}

impl MarketStructure {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uptrend => "uptrend (higher highs + higher lows)",
            Self::Downtrend => "downtrend (lower highs + lower lows)",
            Self::Converging => "converging (lower highs + higher lows)",
            Self::Expanding => "expanding (higher highs + lower lows)",
            Self::RangeBound => "range-bound",
        }
    }

    pub fn sentiment(self) -> Sentiment {
        match self {
            Self::Uptrend => Sentiment::Bullish,
            Self::Downtrend => Sentiment::Bearish,
            Self::Converging | Self::Expanding | Self::RangeBound => Sentiment::Neutral,
        }
    }
}

impl Default for MarketStructure {
    fn default() -> Self {
        Self::RangeBound
    }
}

impl std::fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify structure from swing highs and lows (each in index order).
pub fn classify_structure(highs: &[SwingPoint], lows: &[SwingPoint]) -> MarketStructure {
    let (Some(h), Some(l)) = (last_two(highs), last_two(lows)) else {
        return MarketStructure::RangeBound;
    };

    let highs_rising = h.1 > h.0;
    let highs_falling = h.1 < h.0;
    let lows_rising = l.1 > l.0;
    let lows_falling = l.1 < l.0;

    if highs_rising && lows_rising {
        MarketStructure::Uptrend
    } else if highs_falling && lows_falling {
        MarketStructure::Downtrend
    } else if highs_falling && lows_rising {
        MarketStructure::Converging
    } else if highs_rising && lows_falling {
        MarketStructure::Expanding
    } else {
        MarketStructure::RangeBound
    }
}

fn last_two(points: &[SwingPoint]) -> Option<(f64, f64)> {
    match points {
        [.., prev, last] => Some((prev.value, last.value)),
        _ => None,
    }
}

/// Levels of the `count` most recent swing points, rounded to whole prices,
/// de-duplicated and returned in ascending order.
///
/// Duplicates are dropped after the window is taken, so fewer than `count`
/// levels may come back.
pub fn key_levels(points: &[SwingPoint], count: usize) -> Vec<f64> {
    let recent = &points[points.len().saturating_sub(count)..];
    let mut levels: Vec<f64> = recent.iter().map(|p| p.value.round()).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    levels
}
