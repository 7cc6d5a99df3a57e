// =============================================================================
// Signal Detector — independent UI tags from the latest indicator values
// =============================================================================
//
// Checks (each appends zero or one signal, no suppression between them):
//   - RSI zone:        >= 70 overbought / <= 30 oversold / otherwise neutral
//   - SMA 20 vs 50:    golden / death cross on the last bar, else above / below
//                      (equal counts as below)
//   - MACD histogram:  zero-line crossing on the last bar, else its sign
//                      (zero counts as positive)
//   - Bollinger touch: close at or beyond an outer band
//   - Volume spike:    latest volume > 1.5x trailing average, bullish on an
//                      up close versus the previous day, bearish otherwise

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::analyzer::volume_ratio;
use crate::indicators::{self, calculate_bollinger, calculate_macd, calculate_rsi, calculate_sma};
use crate::runtime_config::AnalysisConfig;
use crate::types::{closes, DailyBar, Sentiment};

/// One display tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: Sentiment,
    pub label: String,
    pub description: String,
}

impl Signal {
    fn new(signal_type: Sentiment, label: &str, description: impl Into<String>) -> Self {
        Self {
            signal_type,
            label: label.to_string(),
            description: description.into(),
        }
    }
}

/// Detect signals with default settings.
pub fn detect_signals(bars: &[DailyBar]) -> Vec<Signal> {
    detect_signals_with(bars, &AnalysisConfig::default())
}

pub fn detect_signals_with(bars: &[DailyBar], config: &AnalysisConfig) -> Vec<Signal> {
    let Some(last) = bars.last() else {
        return Vec::new();
    };
    let closes = closes(bars);
    let params = &config.indicators;
    let thresholds = &config.signals;

    let mut signals = Vec::new();

    // ── RSI zone ─────────────────────────────────────────────────────────
    if let Some(rsi) = indicators::latest(&calculate_rsi(&closes, params.rsi_period)) {
        let signal = if rsi >= thresholds.rsi_overbought {
            Signal::new(Sentiment::Bearish, "RSI Overbought", format!("RSI at {:.1}", rsi))
        } else if rsi <= thresholds.rsi_oversold {
            Signal::new(Sentiment::Bullish, "RSI Oversold", format!("RSI at {:.1}", rsi))
        } else {
            Signal::new(Sentiment::Neutral, "RSI Neutral", format!("RSI at {:.1}", rsi))
        };
        signals.push(signal);
    }

    // ── SMA cross state ──────────────────────────────────────────────────
    let fast = calculate_sma(&closes, thresholds.fast_sma_period);
    let slow = calculate_sma(&closes, thresholds.slow_sma_period);
    if let (Some(fast_now), Some(slow_now)) = (indicators::latest(&fast), indicators::latest(&slow)) {
        let (f, s) = (thresholds.fast_sma_period, thresholds.slow_sma_period);
        let curr_above = fast_now > slow_now;

        let signal = match previous_pair(&fast, &slow).map(|(fp, sp)| fp > sp) {
            Some(false) if curr_above => Signal::new(
                Sentiment::Bullish,
                "Golden Cross",
                format!("SMA{} crossed above SMA{}", f, s),
            ),
            Some(true) if !curr_above => Signal::new(
                Sentiment::Bearish,
                "Death Cross",
                format!("SMA{} crossed below SMA{}", f, s),
            ),
            _ if curr_above => Signal::new(
                Sentiment::Bullish,
                "SMA Uptrend",
                format!("SMA{} above SMA{}", f, s),
            ),
            _ => Signal::new(
                Sentiment::Bearish,
                "SMA Downtrend",
                format!("SMA{} at or below SMA{}", f, s),
            ),
        };
        signals.push(signal);
    }

    // ── MACD histogram ───────────────────────────────────────────────────
    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    if let Some(hist) = macd.last_histogram() {
        let prev = macd
            .histogram
            .len()
            .checked_sub(2)
            .and_then(|i| macd.histogram[i]);

        let signal = match prev {
            Some(p) if p < 0.0 && hist >= 0.0 => Signal::new(
                Sentiment::Bullish,
                "MACD Bullish Cross",
                "Histogram crossed above zero",
            ),
            Some(p) if p >= 0.0 && hist < 0.0 => Signal::new(
                Sentiment::Bearish,
                "MACD Bearish Cross",
                "Histogram crossed below zero",
            ),
            _ if hist >= 0.0 => Signal::new(
                Sentiment::Bullish,
                "MACD Positive",
                format!("Histogram {:.3}", hist),
            ),
            _ => Signal::new(
                Sentiment::Bearish,
                "MACD Negative",
                format!("Histogram {:.3}", hist),
            ),
        };
        signals.push(signal);
    }

    // ── Bollinger touch ──────────────────────────────────────────────────
    let bands = calculate_bollinger(&closes, params.bollinger_period, params.bollinger_std_dev);
    if let Some(bb) = bands.latest().filter(|bb| bb.upper > bb.lower) {
        if last.close >= bb.upper {
            signals.push(Signal::new(
                Sentiment::Bearish,
                "Upper Band Touch",
                format!("Close {:.2} at or above upper band {:.2}", last.close, bb.upper),
            ));
        } else if last.close <= bb.lower {
            signals.push(Signal::new(
                Sentiment::Bullish,
                "Lower Band Touch",
                format!("Close {:.2} at or below lower band {:.2}", last.close, bb.lower),
            ));
        }
    }

    // ── Volume spike ─────────────────────────────────────────────────────
    if let Some(ratio) = volume_ratio(bars, config.volume_lookback) {
        if ratio > thresholds.volume_spike_multiple {
            let prev_close = bars.len().checked_sub(2).map(|i| bars[i].close);
            let direction = match prev_close {
                Some(prev) if last.close > prev => Sentiment::Bullish,
                _ => Sentiment::Bearish,
            };
            signals.push(Signal::new(
                direction,
                "Volume Spike",
                format!("Volume {:.1}x the {}-day average", ratio, config.volume_lookback),
            ));
        }
    }

    trace!(count = signals.len(), "signals detected");
    signals
}

fn previous_pair(fast: &[Option<f64>], slow: &[Option<f64>]) -> Option<(f64, f64)> {
    let i = fast.len().checked_sub(2)?;
    Some((fast[i]?, slow[i]?))
}
