// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_i = mean(values[i - period + 1 ..= i])     for i >= period - 1
//
// Earlier indices have no value.
// =============================================================================

/// Compute the SMA series for `values` with the given look-back `period`.
///
/// The output has the same length as the input; index `i` is `None` until
/// `period` values are available.  `period == 0` yields an all-`None` series.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let period_f = period as f64;
    let mut window_sum: f64 = values[..period].iter().sum();
    result[period - 1] = Some(window_sum / period_f);

    for i in period..values.len() {
        window_sum += values[i] - values[i - period];
        result[i] = Some(window_sum / period_f);
    }

    result
}

/// Most recent SMA value, if enough history exists.
pub fn current_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
