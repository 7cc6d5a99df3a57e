// =============================================================================
// Scoring Model — weighted bullishness score, verdict bands, calibration
// =============================================================================
//
//   rsi       = (50 - RSI) * 2                        * w_rsi
//   bollinger = -((price - middle) / half_width) * 50 * w_bb
//   macd      = ±min(days * 15, 50)                   * w_macd
//   volume    = -10 (thin rally) / +15 (capitulation) * w_vol
//   score     = sum * (1 + (ADX - 25) / 100)   when ADX > 25
//
// Each term is skipped (contributes 0) when its inputs are unavailable.  The
// final score is clamped to [-100, 100].

use serde::{Deserialize, Serialize};

use crate::indicators::BollingerResult;
use crate::runtime_config::{CalibrationAnchor, ScoringParams};
use crate::types::Sentiment;

pub const SCORE_MIN: f64 = -100.0;
pub const SCORE_MAX: f64 = 100.0;

/// Latest indicator readings consumed by the score.
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    pub price: f64,
    pub rsi: Option<f64>,
    pub bollinger: Option<BollingerResult>,
    pub macd_declining_days: usize,
    pub macd_rising_days: usize,
    pub volume_ratio: Option<f64>,
    pub adx: Option<f64>,
}

/// Per-term contributions, kept for logging and explanation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub rsi: f64,
    pub bollinger: f64,
    pub macd: f64,
    pub volume: f64,
    /// 1.0 unless the ADX trend amplifier fired.
    pub adx_multiplier: f64,
    pub score: f64,
}

pub fn compute_score(inputs: &ScoreInputs, params: &ScoringParams) -> ScoreBreakdown {
    let rsi = inputs
        .rsi
        .map_or(0.0, |rsi| (50.0 - rsi) * 2.0 * params.rsi_weight);

    let bollinger = match inputs.bollinger {
        Some(bb) if bb.half_width() > 0.0 => {
            let position = (inputs.price - bb.middle) / bb.half_width();
            -position * 50.0 * params.bollinger_weight
        }
        _ => 0.0,
    };

    let macd_points = |days: usize| (days as f64 * params.macd_points_per_day).min(params.macd_points_cap);
    let macd = (macd_points(inputs.macd_rising_days) - macd_points(inputs.macd_declining_days))
        * params.macd_weight;

    let volume = match (inputs.volume_ratio, inputs.rsi) {
        (Some(ratio), Some(rsi))
            if ratio < params.exhaustion_volume_ratio && rsi > params.exhaustion_rsi =>
        {
            -params.exhaustion_points * params.volume_weight
        }
        (Some(ratio), Some(rsi))
            if ratio > params.capitulation_volume_ratio && rsi < params.capitulation_rsi =>
        {
            params.capitulation_points * params.volume_weight
        }
        _ => 0.0,
    };

    let adx_multiplier = match inputs.adx {
        Some(adx) if adx > params.adx_trend_threshold => 1.0 + (adx - params.adx_trend_threshold) / 100.0,
        _ => 1.0,
    };

    let score = ((rsi + bollinger + macd + volume) * adx_multiplier).clamp(SCORE_MIN, SCORE_MAX);

    ScoreBreakdown {
        rsi,
        bollinger,
        macd,
        volume,
        adx_multiplier,
        score,
    }
}

// =============================================================================
// Verdict bands
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "strong buy")]
    StrongBuy,
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "slight buy")]
    SlightBuy,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "slight sell")]
    SlightSell,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "strong sell")]
    StrongSell,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 40.0 {
            Self::StrongBuy
        } else if score >= 20.0 {
            Self::Buy
        } else if score >= 5.0 {
            Self::SlightBuy
        } else if score > -5.0 {
            Self::Neutral
        } else if score > -20.0 {
            Self::SlightSell
        } else if score > -40.0 {
            Self::Sell
        } else {
            Self::StrongSell
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "strong buy",
            Self::Buy => "buy",
            Self::SlightBuy => "slight buy",
            Self::Neutral => "neutral",
            Self::SlightSell => "slight sell",
            Self::Sell => "sell",
            Self::StrongSell => "strong sell",
        }
    }

    pub fn sentiment(self) -> Sentiment {
        match self {
            Self::StrongBuy | Self::Buy | Self::SlightBuy => Sentiment::Bullish,
            Self::Neutral => Sentiment::Neutral,
            Self::SlightSell | Self::Sell | Self::StrongSell => Sentiment::Bearish,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Win-rate / expected-value calibration
// =============================================================================

/// Calibrated outcome statistics for a score, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub win_rate: f64,
    pub expected_value: f64,
}

/// Piecewise-linear lookup of `score` in an ascending anchor table.
///
/// Scores beyond the table clamp to the end anchors.  Returns `None` only for
/// an empty table.
pub fn calibrate(score: f64, anchors: &[CalibrationAnchor]) -> Option<Calibration> {
    let first = anchors.first()?;
    let last = anchors.last()?;
    let s = score.max(first.score).min(last.score);

    if let Some(exact) = anchors.iter().find(|a| a.score == s) {
        return Some(Calibration {
            win_rate: exact.win_rate,
            expected_value: exact.expected_value,
        });
    }

    anchors.windows(2).find_map(|pair| {
        let (lo, hi) = (pair[0], pair[1]);
        if s > lo.score && s < hi.score {
            let t = (s - lo.score) / (hi.score - lo.score);
            Some(Calibration {
                win_rate: lo.win_rate + (hi.win_rate - lo.win_rate) * t,
                expected_value: lo.expected_value + (hi.expected_value - lo.expected_value) * t,
            })
        } else {
            None
        }
    })
}
