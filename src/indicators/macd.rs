// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(fast) - EMA(slow)
//   Signal    = EMA(signal) over the *defined* MACD values only
//   Histogram = MACD - Signal
//
// All three series are aligned with the input closes.  The signal line is not
// computed over the padded series: it is seeded from the first `signal`
// defined MACD values and then re-indexed back onto the original positions.
// =============================================================================

use super::ema::{calculate_ema, calculate_ema_over_defined};

/// The three MACD series, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    /// Histogram value at the last index, if defined.
    pub fn last_histogram(&self) -> Option<f64> {
        self.histogram.last().copied().flatten()
    }
}

/// Compute MACD with the given `fast`, `slow` and `signal` periods.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal_line = calculate_ema_over_defined(&macd, signal);

    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}

/// Count consecutive trailing steps over which the histogram strictly fell
/// and strictly rose, returned as `(declining, rising)`.
///
/// At most one of the two counts is non-zero.  Counting stops at the first
/// undefined value.
pub fn histogram_trailing_runs(histogram: &[Option<f64>]) -> (usize, usize) {
    let mut declining = 0;
    let mut rising = 0;

    for pair in histogram.windows(2).rev() {
        let (Some(prev), Some(curr)) = (pair[0], pair[1]) else {
            break;
        };
        if curr < prev && rising == 0 {
            declining += 1;
        } else if curr > prev && declining == 0 {
            rising += 1;
        } else {
            break;
        }
    }

    (declining, rising)
}
