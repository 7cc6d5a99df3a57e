// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend strength regardless of direction.
//
//   1. +DM / -DM and True Range per bar transition.
//   2. Wilder's running sums of +DM, -DM and TR over `period`.
//   3. +DI = sum(+DM) / sum(TR) * 100,  -DI = sum(-DM) / sum(TR) * 100
//   4. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   5. ADX = Wilder-smoothed DX, seeded with the mean of the first `period` DX.
//
// ADX > 25 reads as a trending market; the analyzer uses the excess over 25
// to amplify its score.
// =============================================================================

use super::atr::true_range;
use crate::types::DailyBar;

/// Compute the most recent ADX value from daily bars (oldest first).
///
/// Returns `None` when:
/// - `period` is zero.
/// - There are fewer than `2 * period + 1` bars.
/// - The smoothed true range is zero at every step (no price movement at
///   all).  A zero-range stretch inside an otherwise moving series reads as
///   DX 0 for those steps.
pub fn calculate_adx(bars: &[DailyBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < 2 * period + 1 {
        return None;
    }

    let period_f = period as f64;

    let mut plus_dm = Vec::with_capacity(bars.len() - 1);
    let mut minus_dm = Vec::with_capacity(bars.len() - 1);
    let mut tr_vals = Vec::with_capacity(bars.len() - 1);

    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
        tr_vals.push(true_range(bar, prev.close));
    }

    let mut smooth_plus: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    let mut dx_values = Vec::with_capacity(tr_vals.len() - period + 1);
    let mut any_movement = false;
    let mut push_dx = |plus: f64, minus: f64, tr: f64| match directional_index(plus, minus, tr) {
        Some(dx) => {
            any_movement = true;
            dx_values.push(dx);
        }
        None => dx_values.push(0.0),
    };

    push_dx(smooth_plus, smooth_minus, smooth_tr);
    for i in period..tr_vals.len() {
        smooth_plus = smooth_plus - smooth_plus / period_f + plus_dm[i];
        smooth_minus = smooth_minus - smooth_minus / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];
        push_dx(smooth_plus, smooth_minus, smooth_tr);
    }

    if !any_movement || dx_values.len() < period {
        return None;
    }

    let mut adx = dx_values[..period].iter().sum::<f64>() / period_f;
    for &dx in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
    }

    adx.is_finite().then_some(adx)
}

/// DX from smoothed +DM, -DM and TR.
fn directional_index(smooth_plus: f64, smooth_minus: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = smooth_plus / smooth_tr * 100.0;
    let minus_di = smooth_minus / smooth_tr * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some(0.0);
    }

    Some((plus_di - minus_di).abs() / di_sum * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_from(ohlc: impl IntoIterator<Item = (f64, f64, f64, f64)>) -> Vec<DailyBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ohlc.into_iter()
            .enumerate()
            .map(|(i, (o, h, l, c))| DailyBar::new(start + Duration::days(i as i64), o, h, l, c, 1))
            .collect()
    }

    #[test]
    fn adx_period_zero() {
        let bars = bars_from(vec![(1.0, 2.0, 0.5, 1.5); 50]);
        assert!(calculate_adx(&bars, 0).is_none());
    }

    #[test]
    fn adx_insufficient_data() {
        let bars = bars_from(vec![(1.0, 2.0, 0.5, 1.5); 28]);
        assert!(calculate_adx(&bars, 14).is_none());
    }

    #[test]
    fn adx_strong_uptrend() {
        let bars = bars_from((0..60).map(|i| {
            let base = 100.0 + i as f64 * 2.0;
            (base, base + 1.5, base - 0.5, base + 1.0)
        }));
        let value = calculate_adx(&bars, 14).unwrap();
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_no_direction_is_zero() {
        // Same range every day: TR > 0 but no directional movement.
        let bars = bars_from(vec![(100.0, 101.0, 99.0, 100.0); 60]);
        let value = calculate_adx(&bars, 14).unwrap();
        assert!(value < 1e-9, "expected ADX of 0, got {value}");
    }

    #[test]
    fn adx_flat_prices_unavailable() {
        let bars = bars_from(vec![(100.0, 100.0, 100.0, 100.0); 60]);
        assert!(calculate_adx(&bars, 14).is_none());
    }

    #[test]
    fn adx_survives_flat_prefix() {
        // A halted stretch, then a steady climb with a 2.0 daily range.
        let mut ohlc = vec![(100.0, 100.0, 100.0, 100.0); 20];
        ohlc.extend((1..=70).map(|i| {
            let base = 100.0 + i as f64 * 2.0;
            (base - 1.0, base + 1.0, base - 1.0, base)
        }));
        let value = calculate_adx(&bars_from(ohlc), 14).unwrap();
        assert!(value > 25.0, "expected a trending ADX, got {value}");
    }

    #[test]
    fn adx_result_range() {
        let bars = bars_from((0..100).map(|i| {
            let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
            (base - 0.5, base + 1.0, base - 1.0, base + 0.5)
        }));
        let value = calculate_adx(&bars, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "ADX {value} out of range");
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let min = 2 * period + 1;
        let bars = bars_from((0..min).map(|i| {
            let base = 100.0 + i as f64;
            (base, base + 1.0, base - 0.5, base + 0.5)
        }));
        assert!(calculate_adx(&bars, period).is_some());
        assert!(calculate_adx(&bars[..min - 1], period).is_none());
    }
}
