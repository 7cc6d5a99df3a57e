// =============================================================================
// Analysis Configuration — every tunable constant of the verdict engine
// =============================================================================
//
// Indicator periods, scoring weights, the win-rate calibration table and the
// split-detection thresholds all live here so they can be revalidated against
// a fresh backtest without touching code.
//
// Persistence uses an atomic tmp + rename pattern.  All fields carry serde
// defaults so a partial (or empty) JSON file loads cleanly.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_swing_window() -> usize {
    5
}

fn default_level_count() -> usize {
    3
}

fn default_volume_lookback() -> usize {
    20
}

fn default_range_lookback() -> usize {
    90
}

fn default_stop_atr_multiple() -> f64 {
    2.0
}

fn default_target_atr_multiple() -> f64 {
    3.0
}

/// Free-tier quote APIs allow 5 calls per minute; 13 s keeps a margin.
fn default_fetch_interval_ms() -> u64 {
    13_000
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back periods for the indicator library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub trend_sma_period: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            trend_sma_period: 50,
            rsi_period: 14,
            atr_period: 14,
            adx_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

// =============================================================================
// ScoringParams
// =============================================================================

/// Component weights and thresholds of the bullishness score.
///
/// These are empirically fit constants from an offline backtest; treat them
/// as configuration to be revalidated, not as derived truths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub rsi_weight: f64,
    pub bollinger_weight: f64,
    pub macd_weight: f64,
    pub volume_weight: f64,

    /// Score points per consecutive day of histogram decline / rise.
    pub macd_points_per_day: f64,
    /// Cap on the MACD run points before weighting.
    pub macd_points_cap: f64,

    /// Low-participation exhaustion: volume ratio below this with RSI above
    /// `exhaustion_rsi` subtracts `exhaustion_points`.
    pub exhaustion_volume_ratio: f64,
    pub exhaustion_rsi: f64,
    pub exhaustion_points: f64,

    /// Capitulation: volume ratio above this with RSI below
    /// `capitulation_rsi` adds `capitulation_points`.
    pub capitulation_volume_ratio: f64,
    pub capitulation_rsi: f64,
    pub capitulation_points: f64,

    /// ADX above this amplifies the whole score by `1 + (ADX - t) / 100`.
    pub adx_trend_threshold: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            rsi_weight: 0.35,
            bollinger_weight: 0.25,
            macd_weight: 0.20,
            volume_weight: 0.20,
            macd_points_per_day: 15.0,
            macd_points_cap: 50.0,
            exhaustion_volume_ratio: 0.8,
            exhaustion_rsi: 70.0,
            exhaustion_points: 10.0,
            capitulation_volume_ratio: 1.2,
            capitulation_rsi: 35.0,
            capitulation_points: 15.0,
            adx_trend_threshold: 25.0,
        }
    }
}

// =============================================================================
// Calibration table
// =============================================================================

/// One `(score, win rate %, expected value %)` anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationAnchor {
    pub score: f64,
    pub win_rate: f64,
    pub expected_value: f64,
}

impl CalibrationAnchor {
    pub const fn new(score: f64, win_rate: f64, expected_value: f64) -> Self {
        Self {
            score,
            win_rate,
            expected_value,
        }
    }
}

fn default_calibration() -> Vec<CalibrationAnchor> {
    vec![
        CalibrationAnchor::new(-100.0, 48.0, -0.1),
        CalibrationAnchor::new(-40.0, 51.0, 0.4),
        CalibrationAnchor::new(0.0, 53.0, 0.6),
        CalibrationAnchor::new(25.0, 56.0, 1.1),
        CalibrationAnchor::new(40.0, 67.0, 2.6),
        CalibrationAnchor::new(100.0, 67.0, 2.6),
    ]
}

// =============================================================================
// Split thresholds
// =============================================================================

/// Open / previous-close ratios treated as a stock split.
///
/// Heuristic guards against ordinary gaps being misread as splits; tune them
/// if a data source shows legitimate gaps beyond these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitThresholds {
    /// Ratio below this is a forward (N:1) split.
    pub forward_below: f64,
    /// Ratio above this is a reverse (1:N) split.
    pub reverse_above: f64,
}

impl Default for SplitThresholds {
    fn default() -> Self {
        Self {
            forward_below: 0.4,
            reverse_above: 2.5,
        }
    }
}

// =============================================================================
// SignalParams
// =============================================================================

/// Thresholds for the UI signal tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub fast_sma_period: usize,
    pub slow_sma_period: usize,
    pub volume_spike_multiple: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            fast_sma_period: 20,
            slow_sma_period: 50,
            volume_spike_multiple: 1.5,
        }
    }
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Top-level configuration for the verdict engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Half-width of the swing-point neighbourhood.
    #[serde(default = "default_swing_window")]
    pub swing_window: usize,

    /// Number of support / resistance levels to report.
    #[serde(default = "default_level_count")]
    pub level_count: usize,

    /// Days in the trailing average-volume window.
    #[serde(default = "default_volume_lookback")]
    pub volume_lookback: usize,

    /// Days used for the "distance from high" range context.
    #[serde(default = "default_range_lookback")]
    pub range_lookback: usize,

    /// Stop distance below price in ATRs.
    #[serde(default = "default_stop_atr_multiple")]
    pub stop_atr_multiple: f64,

    /// Target distance above price in ATRs.
    #[serde(default = "default_target_atr_multiple")]
    pub target_atr_multiple: f64,

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub scoring: ScoringParams,

    /// Score-to-outcome calibration anchors, ascending by score.
    #[serde(default = "default_calibration")]
    pub calibration: Vec<CalibrationAnchor>,

    #[serde(default)]
    pub splits: SplitThresholds,

    #[serde(default)]
    pub signals: SignalParams,

    /// Minimum spacing between upstream quote fetches.
    #[serde(default = "default_fetch_interval_ms")]
    pub fetch_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            swing_window: default_swing_window(),
            level_count: default_level_count(),
            volume_lookback: default_volume_lookback(),
            range_lookback: default_range_lookback(),
            stop_atr_multiple: default_stop_atr_multiple(),
            target_atr_multiple: default_target_atr_multiple(),
            indicators: IndicatorParams::default(),
            scoring: ScoringParams::default(),
            calibration: default_calibration(),
            splits: SplitThresholds::default(),
            signals: SignalParams::default(),
            fetch_interval_ms: default_fetch_interval_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            anchors = config.calibration.len(),
            swing_window = config.swing_window,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }
}
