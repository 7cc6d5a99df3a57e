// =============================================================================
// Stock Analyzer — one structured verdict per bar sequence
// =============================================================================
//
// Pipeline:
//   1. Market structure from swing highs / lows of closes
//   2. Trend context: price vs SMA(50)
//   3. Momentum: RSI(14)
//   4. Volume context: latest volume vs trailing average
//   5. Volatility: ATR(14) stop (-2 ATR) and target (+3 ATR)
//   6. Range context: distance from the 90-day high
//   7. Bollinger position
//   8. Support / resistance from recent swing points
//   9. Score -> verdict -> calibrated win rate / EV, reasons, next actions
//
// Every input is read-only and nothing is cached between calls, so the
// analyzer may run concurrently for any number of symbols.
// =============================================================================

pub mod actions;
pub mod scoring;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{self, macd::histogram_trailing_runs, sma::current_sma};
use crate::runtime_config::AnalysisConfig;
use crate::structure::{self, MarketStructure};
use crate::types::{closes, DailyBar, Sentiment};

pub use actions::{NextAction, Priority};
pub use scoring::{Calibration, ScoreBreakdown, Verdict};

/// Distance from the range high (in %) that counts as "near the high".
const NEAR_HIGH_PCT: f64 = 3.0;
/// Distance below the range high (in %) that counts as a deep pullback.
const DEEP_PULLBACK_PCT: f64 = 15.0;
/// Fractional distance from an outer band that counts as touching it; the
/// same distance beyond the lower band is a deep break.
const BAND_TOLERANCE: f64 = 0.01;
/// RSI below this is extreme, ahead of the ordinary oversold line.
const RSI_EXTREME_OVERSOLD: f64 = 20.0;

/// A tagged, human-readable factor behind the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    #[serde(rename = "type")]
    pub tag: Sentiment,
    pub text: String,
}

impl Reason {
    fn new(tag: Sentiment, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// Latest indicator readings used by the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub sma_trend: Option<f64>,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub pct_from_high: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub percent_b: Option<f64>,
    pub macd_histogram: Option<f64>,
}

/// The analyzer's output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub price: f64,
    pub structure: MarketStructure,
    pub score: f64,
    pub verdict: Verdict,
    pub verdict_type: Sentiment,
    pub win_rate: f64,
    pub expected_value: f64,
    pub reasons: Vec<Reason>,
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
    pub atr_stop: Option<f64>,
    pub atr_target: Option<f64>,
    pub upside_pct: Option<f64>,
    pub downside_risk: Option<f64>,
    pub next_actions: Vec<NextAction>,
    pub breakdown: ScoreBreakdown,
    pub indicators: IndicatorSnapshot,
}

/// Analyze `bars` (oldest first, already split-adjusted) with default settings.
///
/// Returns `None` only for an empty sequence.
pub fn analyze(bars: &[DailyBar]) -> Option<StockAnalysis> {
    analyze_with(bars, &AnalysisConfig::default())
}

/// Analyze `bars` with an explicit configuration.
pub fn analyze_with(bars: &[DailyBar], config: &AnalysisConfig) -> Option<StockAnalysis> {
    let last = bars.last()?;
    let price = last.close;
    let closes = closes(bars);
    let params = &config.indicators;

    // ── 1. Structure ─────────────────────────────────────────────────────
    let swing_highs = structure::find_swing_highs(&closes, config.swing_window);
    let swing_lows = structure::find_swing_lows(&closes, config.swing_window);
    let market_structure = structure::classify_structure(&swing_highs, &swing_lows);

    // ── 2-4. Trend, momentum, participation ──────────────────────────────
    let sma_trend = current_sma(&closes, params.trend_sma_period);
    let rsi = indicators::latest(&indicators::calculate_rsi(&closes, params.rsi_period));
    let volume_ratio = volume_ratio(bars, config.volume_lookback);

    // ── 5. Volatility targets ────────────────────────────────────────────
    let atr = indicators::calculate_atr(bars, params.atr_period);
    let atr_stop = atr.map(|a| price - config.stop_atr_multiple * a);
    let atr_target = atr.map(|a| price + config.target_atr_multiple * a);
    let upside_pct = atr_target.map(|t| (t - price) / price * 100.0);
    let downside_risk = atr_stop.map(|s| (price - s) / price * 100.0);

    // ── 6. Range context ─────────────────────────────────────────────────
    let pct_from_high = pct_from_range_high(bars, config.range_lookback);

    // ── 7. Bollinger, MACD, ADX ──────────────────────────────────────────
    let bollinger = indicators::calculate_bollinger(&closes, params.bollinger_period, params.bollinger_std_dev)
        .latest();
    let macd = indicators::calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let (macd_declining_days, macd_rising_days) = histogram_trailing_runs(&macd.histogram);
    let adx = indicators::calculate_adx(bars, params.adx_period);

    // ── 8. Key levels ────────────────────────────────────────────────────
    let support = structure::key_levels(&swing_lows, config.level_count);
    let resistance = structure::key_levels(&swing_highs, config.level_count);

    // ── 9. Score & verdict ───────────────────────────────────────────────
    let breakdown = scoring::compute_score(
        &scoring::ScoreInputs {
            price,
            rsi,
            bollinger,
            macd_declining_days,
            macd_rising_days,
            volume_ratio,
            adx,
        },
        &config.scoring,
    );
    let score = breakdown.score;
    let verdict = Verdict::from_score(score);
    let calibration = scoring::calibrate(score, &config.calibration).unwrap_or_default();

    let snapshot = IndicatorSnapshot {
        sma_trend,
        rsi,
        atr,
        adx,
        volume_ratio,
        pct_from_high,
        bollinger_upper: bollinger.map(|b| b.upper),
        bollinger_middle: bollinger.map(|b| b.middle),
        bollinger_lower: bollinger.map(|b| b.lower),
        percent_b: bollinger.map(|b| b.percent_b(price)),
        macd_histogram: macd.last_histogram(),
    };

    let prev_close = bars.len().checked_sub(2).map(|i| bars[i].close);
    let reasons = build_reasons(market_structure, price, prev_close, &snapshot, &breakdown, config);

    let next_actions = actions::plan_next_actions(&actions::ActionContext {
        price,
        structure: market_structure,
        rsi,
        rsi_oversold: config.signals.rsi_oversold,
        rsi_overbought: config.signals.rsi_overbought,
        support: &support,
        resistance: &resistance,
        atr_stop,
    });

    debug!(
        bars = bars.len(),
        structure = %market_structure,
        score = format!("{:.2}", score),
        verdict = %verdict,
        rsi_term = format!("{:.2}", breakdown.rsi),
        bollinger_term = format!("{:.2}", breakdown.bollinger),
        macd_term = format!("{:.2}", breakdown.macd),
        volume_term = format!("{:.2}", breakdown.volume),
        adx_multiplier = format!("{:.3}", breakdown.adx_multiplier),
        "analysis complete"
    );

    Some(StockAnalysis {
        price,
        structure: market_structure,
        score,
        verdict,
        verdict_type: verdict.sentiment(),
        win_rate: calibration.win_rate,
        expected_value: calibration.expected_value,
        reasons,
        support,
        resistance,
        atr_stop,
        atr_target,
        upside_pct,
        downside_risk,
        next_actions,
        breakdown,
        indicators: snapshot,
    })
}

/// Latest volume divided by the mean volume of the trailing `lookback` bars
/// (including the latest, or all bars when fewer exist).
pub fn volume_ratio(bars: &[DailyBar], lookback: usize) -> Option<f64> {
    let last = bars.last()?;
    let window = &bars[bars.len().saturating_sub(lookback.max(1))..];
    let average = window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64;
    if average == 0.0 {
        return None;
    }
    Some(last.volume as f64 / average)
}

/// Percentage distance of the latest close from the highest high of the
/// trailing `lookback` bars (zero or negative).
fn pct_from_range_high(bars: &[DailyBar], lookback: usize) -> Option<f64> {
    let last = bars.last()?;
    let window = &bars[bars.len().saturating_sub(lookback.max(1))..];
    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    if high <= 0.0 {
        return None;
    }
    Some((last.close - high) / high * 100.0)
}

fn build_reasons(
    market_structure: MarketStructure,
    price: f64,
    prev_close: Option<f64>,
    snapshot: &IndicatorSnapshot,
    breakdown: &ScoreBreakdown,
    config: &AnalysisConfig,
) -> Vec<Reason> {
    let mut reasons = Vec::new();
    let trend_period = config.indicators.trend_sma_period;

    reasons.push(Reason::new(
        market_structure.sentiment(),
        format!("Structure: {}", market_structure),
    ));

    match snapshot.sma_trend {
        Some(sma) if price > sma => reasons.push(Reason::new(
            Sentiment::Bullish,
            format!("Price above {}-day SMA ({:.2})", trend_period, sma),
        )),
        Some(sma) if price < sma => reasons.push(Reason::new(
            Sentiment::Bearish,
            format!("Price below {}-day SMA ({:.2})", trend_period, sma),
        )),
        Some(sma) => reasons.push(Reason::new(
            Sentiment::Neutral,
            format!("Price sitting on {}-day SMA ({:.2})", trend_period, sma),
        )),
        None => reasons.push(Reason::new(
            Sentiment::Neutral,
            format!("Not enough history for {}-day SMA", trend_period),
        )),
    }

    if let Some(rsi) = snapshot.rsi {
        let reason = if rsi < RSI_EXTREME_OVERSOLD {
            Reason::new(Sentiment::Bullish, format!("RSI extremely oversold ({:.1})", rsi))
        } else if rsi < config.signals.rsi_oversold {
            Reason::new(Sentiment::Bullish, format!("RSI oversold ({:.1})", rsi))
        } else if rsi > config.signals.rsi_overbought {
            Reason::new(Sentiment::Bearish, format!("RSI overbought ({:.1})", rsi))
        } else {
            Reason::new(Sentiment::Neutral, format!("RSI neutral ({:.1})", rsi))
        };
        reasons.push(reason);
    }

    if let Some(ratio) = snapshot.volume_ratio {
        if ratio > config.signals.volume_spike_multiple {
            let tag = match prev_close {
                Some(prev) if price > prev => Sentiment::Bullish,
                Some(prev) if price < prev => Sentiment::Bearish,
                _ => Sentiment::Neutral,
            };
            reasons.push(Reason::new(
                tag,
                format!("Volume spike: {:.1}x the {}-day average", ratio, config.volume_lookback),
            ));
        }
    }

    if let (Some(upper), Some(lower)) = (snapshot.bollinger_upper, snapshot.bollinger_lower) {
        if upper > lower {
            if price <= lower * (1.0 - BAND_TOLERANCE) {
                reasons.push(Reason::new(Sentiment::Bullish, "Deep below lower Bollinger band"));
            } else if price <= lower * (1.0 + BAND_TOLERANCE) {
                reasons.push(Reason::new(Sentiment::Bullish, "Near lower Bollinger band"));
            } else if price >= upper * (1.0 - BAND_TOLERANCE) {
                reasons.push(Reason::new(Sentiment::Bearish, "Near upper Bollinger band"));
            }
        }
    }

    if let Some(pct) = snapshot.pct_from_high {
        if pct > -NEAR_HIGH_PCT {
            reasons.push(Reason::new(
                Sentiment::Bearish,
                format!("Near {}-day high ({:.1}% away)", config.range_lookback, pct.abs()),
            ));
        } else if pct < -DEEP_PULLBACK_PCT {
            reasons.push(Reason::new(
                Sentiment::Bullish,
                format!("{:.1}% below {}-day high", pct.abs(), config.range_lookback),
            ));
        }
    }

    if breakdown.adx_multiplier > 1.0 {
        if let Some(adx) = snapshot.adx {
            reasons.push(Reason::new(
                Sentiment::Neutral,
                format!("Strong trend (ADX {:.1}) amplifies score x{:.2}", adx, breakdown.adx_multiplier),
            ));
        }
    }

    reasons
}
