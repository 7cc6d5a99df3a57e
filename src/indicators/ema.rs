// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The first EMA value (index `period - 1`) is seeded with the SMA of the
// first `period` values.  Indices before the seed have no value.
// =============================================================================

/// Compute the EMA series for `values` and look-back `period`.
///
/// The output is aligned with the input: element `i` is `None` for
/// `i < period - 1` and `Some(ema)` afterwards.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `values.len() < period` => all `None`
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(seed);

    let mut prev_ema = seed;
    for (i, &value) in values.iter().enumerate().skip(period) {
        let ema = (value - prev_ema) * multiplier + prev_ema;
        result[i] = Some(ema);
        prev_ema = ema;
    }

    result
}

/// Run an EMA over only the defined entries of a gapped series and map the
/// result back onto the original indices.
///
/// Used for the MACD signal line, which must be seeded from the first
/// `period` *defined* MACD values rather than from the padded series.
pub fn calculate_ema_over_defined(series: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let (indices, values): (Vec<usize>, Vec<f64>) = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .unzip();

    let compact = calculate_ema(&values, period);

    let mut result = vec![None; series.len()];
    for (slot, ema) in indices.into_iter().zip(compact) {
        result[slot] = ema;
    }
    result
}
