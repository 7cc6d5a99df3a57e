// =============================================================================
// Signals Module
// =============================================================================
//
// Stateless detection of discrete, order-independent display tags
// (RSI zone, SMA cross, MACD, Bollinger touch, volume spike).

pub mod detector;

pub use detector::{detect_signals, detect_signals_with, Signal};
