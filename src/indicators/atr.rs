// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR here is the plain mean of the trailing `period` TR values, giving a
// single latest reading for stop / target placement.
// =============================================================================

use crate::types::DailyBar;

/// True Range of `bar` relative to the previous close.
pub fn true_range(bar: &DailyBar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

/// Compute the latest ATR from a slice of daily bars (oldest first).
///
/// # Returns
/// `None` when `period` is zero or there are fewer than `period + 1` bars
/// (each TR needs a previous close).
pub fn calculate_atr(bars: &[DailyBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let start = bars.len() - period;
    let sum: f64 = (start..bars.len())
        .map(|i| true_range(&bars[i], bars[i - 1].close))
        .sum();

    Some(sum / period as f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> DailyBar {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        DailyBar::new(date, open, high, low, close, 100)
    }

    #[test]
    fn atr_period_zero() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 20];
        assert!(calculate_atr(&bars, 0).is_none());
    }

    #[test]
    fn atr_insufficient_data() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 14];
        assert!(calculate_atr(&bars, 14).is_none());
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 15];
        assert!(calculate_atr(&bars, 14).is_some());
    }

    #[test]
    fn atr_constant_range() {
        let bars: Vec<DailyBar> = (0..30)
            .map(|_| bar(100.0, 105.0, 95.0, 100.0))
            .collect();
        let atr = calculate_atr(&bars, 14).unwrap();
        assert!((atr - 10.0).abs() < 1e-10, "expected 10.0, got {atr}");
    }

    #[test]
    fn atr_flat_is_zero() {
        let bars = vec![bar(100.0, 100.0, 100.0, 100.0); 30];
        assert_eq!(calculate_atr(&bars, 14), Some(0.0));
    }

    #[test]
    fn atr_uses_only_trailing_window() {
        // Early wide bars must not leak into a 3-period ATR.
        let mut bars = vec![bar(100.0, 150.0, 50.0, 100.0); 5];
        bars.extend(vec![bar(100.0, 101.0, 99.0, 100.0); 4]);
        let atr = calculate_atr(&bars, 3).unwrap();
        assert!((atr - 2.0).abs() < 1e-10, "expected 2.0, got {atr}");
    }

    #[test]
    fn atr_true_range_uses_prev_close() {
        let prev_close = 95.0;
        let gap_up = bar(110.0, 115.0, 108.0, 112.0);
        assert_eq!(true_range(&gap_up, prev_close), 20.0);
    }
}
