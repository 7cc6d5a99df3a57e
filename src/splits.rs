// =============================================================================
// Split Adjustment
// =============================================================================
//
// Walks the bars forward comparing each open with the previous close:
//
//   ratio < forward_below  => N:1 forward split, N = round(1 / ratio)
//                             earlier prices / N, earlier volume * N
//   ratio > reverse_above  => 1:N reverse split, N = round(ratio)
//                             earlier prices * N, earlier volume / N
//
// Only bars strictly before the split day are rescaled.  Boundaries are
// handled oldest-first, so bars before several splits pick up every factor.
// The input slice is never mutated.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::runtime_config::SplitThresholds;
use crate::types::DailyBar;

/// Direction of a detected split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Forward,
    Reverse,
}

/// A split boundary found in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    /// Index of the first post-split bar.
    pub index: usize,
    pub date: NaiveDate,
    pub kind: SplitKind,
    pub factor: u32,
}

/// Adjusted bars plus the boundaries that were corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAdjustment {
    pub bars: Vec<DailyBar>,
    pub events: Vec<SplitEvent>,
}

/// Split-adjust `bars` with the default 0.4 / 2.5 thresholds.
pub fn adjust_for_splits(bars: &[DailyBar]) -> Vec<DailyBar> {
    detect_and_adjust(bars, &SplitThresholds::default()).bars
}

/// Split-adjust `bars` with explicit thresholds, reporting every boundary.
pub fn detect_and_adjust(bars: &[DailyBar], thresholds: &SplitThresholds) -> SplitAdjustment {
    let mut adjusted = bars.to_vec();
    let mut events = Vec::new();

    for i in 1..adjusted.len() {
        let prev_close = adjusted[i - 1].close;
        if prev_close <= 0.0 {
            continue;
        }
        let ratio = adjusted[i].open / prev_close;

        let (kind, factor) = if ratio < thresholds.forward_below {
            (SplitKind::Forward, (1.0 / ratio).round())
        } else if ratio > thresholds.reverse_above {
            (SplitKind::Reverse, ratio.round())
        } else {
            continue;
        };

        if !factor.is_finite() || factor < 2.0 {
            debug!(index = i, ratio, "gap looks like a split but rounds below 2:1, skipping");
            continue;
        }

        for bar in &mut adjusted[..i] {
            rescale(bar, kind, factor);
        }

        let event = SplitEvent {
            index: i,
            date: adjusted[i].date,
            kind,
            factor: factor as u32,
        };
        info!(
            date = %event.date,
            kind = ?event.kind,
            factor = event.factor,
            ratio = format!("{:.4}", ratio),
            "split detected, earlier bars rescaled"
        );
        events.push(event);
    }

    SplitAdjustment {
        bars: adjusted,
        events,
    }
}

fn rescale(bar: &mut DailyBar, kind: SplitKind, factor: f64) {
    match kind {
        SplitKind::Forward => {
            bar.open /= factor;
            bar.high /= factor;
            bar.low /= factor;
            bar.close /= factor;
            bar.volume = (bar.volume as f64 * factor).round() as u64;
        }
        SplitKind::Reverse => {
            bar.open *= factor;
            bar.high *= factor;
            bar.low *= factor;
            bar.close *= factor;
            bar.volume = (bar.volume as f64 / factor).round() as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
    }

    fn flat_bar(i: usize, price: f64, volume: u64) -> DailyBar {
        DailyBar::new(day(i), price, price * 1.01, price * 0.99, price, volume)
    }

    #[test]
    fn forward_split_four_to_one() {
        let mut bars: Vec<DailyBar> = (0..45).map(|i| flat_bar(i, 400.0, 1_000)).collect();
        bars.extend((45..90).map(|i| flat_bar(i, 100.0, 4_000)));

        let result = detect_and_adjust(&bars, &SplitThresholds::default());
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].index, 45);
        assert_eq!(result.events[0].kind, SplitKind::Forward);
        assert_eq!(result.events[0].factor, 4);

        for bar in &result.bars[..45] {
            assert!((bar.close - 100.0).abs() < 1e-9);
            assert!((bar.high - 101.0).abs() < 1e-9);
            assert_eq!(bar.volume, 4_000);
        }
        assert_eq!(result.bars[45..], bars[45..]);
    }

    #[test]
    fn two_to_one_recovers_continuous_line() {
        // Underlying price rises 1 per day; the split halves prices from day 30.
        let bars: Vec<DailyBar> = (0..60)
            .map(|i| {
                let true_price = 100.0 + i as f64;
                if i < 30 {
                    flat_bar(i, true_price, 500)
                } else {
                    flat_bar(i, true_price / 2.0, 1_000)
                }
            })
            .collect();

        // A 2:1 split opens at ~0.5x, above the default 0.4 guard.
        assert_eq!(adjust_for_splits(&bars), bars);

        let loose = SplitThresholds {
            forward_below: 0.6,
            reverse_above: 2.5,
        };
        let adjusted = detect_and_adjust(&bars, &loose).bars;
        for (i, bar) in adjusted.iter().enumerate() {
            let expected = (100.0 + i as f64) / 2.0;
            assert!((bar.close - expected).abs() < 1e-9, "day {i}: {} vs {expected}", bar.close);
            assert_eq!(bar.volume, 1_000);
        }
    }

    #[test]
    fn reverse_split_one_to_five() {
        let mut bars: Vec<DailyBar> = (0..10).map(|i| flat_bar(i, 2.0, 5_003)).collect();
        bars.extend((10..20).map(|i| flat_bar(i, 10.0, 1_000)));

        let result = detect_and_adjust(&bars, &SplitThresholds::default());
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, SplitKind::Reverse);
        assert_eq!(result.events[0].factor, 5);
        for bar in &result.bars[..10] {
            assert!((bar.close - 10.0).abs() < 1e-9);
            assert_eq!(bar.volume, 1_001);
        }
    }

    #[test]
    fn multiple_splits_compound() {
        let mut bars: Vec<DailyBar> = (0..10).map(|i| flat_bar(i, 800.0, 100)).collect();
        bars.extend((10..20).map(|i| flat_bar(i, 400.0, 200)));
        bars.extend((20..30).map(|i| flat_bar(i, 100.0, 800)));

        // 400/800 = 0.5 is an ordinary gap; only 100/400 is a split.
        let result = detect_and_adjust(&bars, &SplitThresholds::default());
        assert_eq!(result.events.len(), 1);

        // Lower the threshold so both boundaries count.
        let loose = SplitThresholds {
            forward_below: 0.6,
            reverse_above: 2.5,
        };
        let result = detect_and_adjust(&bars, &loose);
        assert_eq!(result.events.len(), 2);
        for bar in &result.bars {
            assert!((bar.close - 100.0).abs() < 1e-9);
            assert_eq!(bar.volume, 800);
        }
    }

    #[test]
    fn adjustment_is_idempotent() {
        let mut bars: Vec<DailyBar> = (0..20).map(|i| flat_bar(i, 300.0, 10)).collect();
        bars.extend((20..40).map(|i| flat_bar(i, 100.0, 30)));

        let once = adjust_for_splits(&bars);
        let twice = adjust_for_splits(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn ordinary_gaps_untouched() {
        let bars = vec![flat_bar(0, 100.0, 10), flat_bar(1, 60.0, 10), flat_bar(2, 140.0, 10)];
        assert_eq!(adjust_for_splits(&bars), bars);
    }

    #[test]
    fn input_is_not_mutated() {
        let mut bars: Vec<DailyBar> = (0..5).map(|i| flat_bar(i, 200.0, 10)).collect();
        bars.extend((5..10).map(|i| flat_bar(i, 50.0, 40)));
        let snapshot = bars.clone();
        let _ = adjust_for_splits(&bars);
        assert_eq!(bars, snapshot);
    }
}
