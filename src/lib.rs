// =============================================================================
// Stock Verdict — daily OHLCV technical analysis engine
// =============================================================================
//
// Pure, stateless analysis over a chronological slice of daily bars:
// indicators, swing structure, split adjustment, a weighted score with a
// calibrated verdict, and independent display signals.  The only stateful
// piece is the `FetchQueue`, which spaces out upstream quote fetches.
// =============================================================================

pub mod analyzer;
pub mod fetch_queue;
pub mod indicators;
pub mod runtime_config;
pub mod signals;
pub mod splits;
pub mod structure;
pub mod types;

pub use analyzer::{analyze, analyze_with, StockAnalysis};
pub use fetch_queue::{FetchQueue, FetchQueueSnapshot};
pub use runtime_config::AnalysisConfig;
pub use signals::{detect_signals, detect_signals_with, Signal};
pub use splits::{adjust_for_splits, detect_and_adjust, SplitAdjustment, SplitEvent};
pub use types::{validate_bars, DailyBar, Sentiment};
