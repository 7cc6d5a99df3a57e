// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math over plain price slices.  Series
// functions return a `Vec<Option<f64>>` aligned with their input, where
// `None` marks the leading indices that lack enough history.  Scalar
// functions (ATR, ADX) return `Option<f64>` for the latest bar.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use adx::calculate_adx;
pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands, BollingerResult};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

/// Last element of an indicator series, if defined.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}
