// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.  The seeded value belongs to index `period`.
// Step 3 — Apply Wilder's smoothing for every later index:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RSI = 100                        if avg_loss == 0
//          RSI = 100 - 100 / (1 + RS)       otherwise, RS = avg_gain / avg_loss
//
// A perfectly flat series therefore reads 100, not 50.
// =============================================================================

/// Compute the RSI series for `closes`, aligned with the input.
///
/// Indices `< period` are `None`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `closes.len() < period + 1` => all `None` (need `period` deltas)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return result;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;
    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // deltas[i - 1] is the change that lands on closes[i].
    for i in (period + 1)..closes.len() {
        let delta = deltas[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_leading_gap_ends_at_period() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_reads_100() {
        // No losses at all => avg_loss == 0 => RSI pinned at 100.
        let closes = vec![100.0; 30];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.iter().flatten().count(), 16);
        for v in series.into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_uses_wilder_smoothing() {
        // Seed: 2 gains of 1 and 2 losses of 1 over period 4 => avg 0.5 / 0.5.
        // Next delta +2: avg_gain = (0.5*3 + 2)/4 = 0.875, avg_loss = 0.375.
        let closes = vec![10.0, 11.0, 10.0, 11.0, 10.0, 12.0];
        let series = calculate_rsi(&closes, 4);
        assert!((series[4].unwrap() - 50.0).abs() < 1e-10);
        let expected = 100.0 - 100.0 / (1.0 + 0.875 / 0.375);
        assert!((series[5].unwrap() - expected).abs() < 1e-10);
    }
}
