// =============================================================================
// Shared types used across the analysis engine
// =============================================================================

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl DailyBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Extract the closing prices of a bar sequence (oldest first).
pub fn closes(bars: &[DailyBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Directional tag attached to verdicts, reasons and signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Ingestion-side sanity check for a bar sequence.
///
/// The engine itself never fails on bad numbers; callers run this before
/// handing data over so that empty input, non-positive prices and unordered
/// dates are rejected at the boundary instead of surfacing as NaN later.
pub fn validate_bars(bars: &[DailyBar]) -> Result<()> {
    if bars.is_empty() {
        bail!("bar sequence is empty");
    }

    for (i, bar) in bars.iter().enumerate() {
        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("bar {} ({}): {} must be a positive finite price, got {}", i, bar.date, name, value);
            }
        }
        if bar.high < bar.low {
            bail!("bar {} ({}): high {} is below low {}", i, bar.date, bar.high, bar.low);
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            bail!(
                "bar {} ({}): dates must be strictly increasing (previous {})",
                i,
                bar.date,
                bars[i - 1].date
            );
        }
    }

    Ok(())
}
