// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the trailing `period` closes.
//
// Band Width (BBW) = (upper - lower) / middle * 100
// %B               = (price - lower) / (upper - lower)
//
// A zero-width band (flat prices) reports %B as the neutral 0.5.

use super::sma::calculate_sma;

/// Full band series, each the same length as the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Band values at a single index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

impl BollingerResult {
    /// Half the distance between the outer bands.
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }

    /// Position of `price` inside the band: 0 at the lower band, 1 at the upper.
    pub fn percent_b(&self, price: f64) -> f64 {
        let span = self.upper - self.lower;
        if span == 0.0 {
            return 0.5;
        }
        (price - self.lower) / span
    }
}

impl BollingerBands {
    /// Band values at the last index, if defined.
    pub fn latest(&self) -> Option<BollingerResult> {
        let upper = self.upper.last().copied().flatten()?;
        let middle = self.middle.last().copied().flatten()?;
        let lower = self.lower.last().copied().flatten()?;
        let width = if middle == 0.0 {
            0.0
        } else {
            (upper - lower) / middle * 100.0
        };
        Some(BollingerResult {
            upper,
            middle,
            lower,
            width,
        })
    }
}

/// Calculate the Bollinger Band series for `closes`.
///
/// Every index with a defined middle band also has defined outer bands.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let middle = calculate_sma(closes, period);
    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];

    for (i, mid) in middle.iter().enumerate() {
        let Some(mid) = *mid else { continue };
        let window = &closes[i + 1 - period..=i];
        let variance = window.iter().map(|x| (x - mid).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();
        upper[i] = Some(mid + num_std * std_dev);
        lower[i] = Some(mid - num_std * std_dev);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).latest().unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!(bb.width > 0.0);
        assert!((bb.middle - 10.5).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bands = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert_eq!(bands.upper.len(), 3);
        assert!(bands.latest().is_none());
    }

    #[test]
    fn bollinger_flat_collapses() {
        let bb = calculate_bollinger(&vec![100.0; 20], 20, 2.0).latest().unwrap();
        assert_eq!(bb.upper, 100.0);
        assert_eq!(bb.lower, 100.0);
        assert!((bb.width - 0.0).abs() < 1e-10);
        assert_eq!(bb.percent_b(100.0), 0.5);
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.4).cos() * 6.0).collect();
        let bands = calculate_bollinger(&closes, 20, 2.0);
        for i in 0..closes.len() {
            match (bands.upper[i], bands.middle[i], bands.lower[i]) {
                (Some(u), Some(m), Some(l)) => assert!(((u - m) - (m - l)).abs() < 1e-9),
                (None, None, None) => assert!(i < 19),
                _ => panic!("partially defined bands at {i}"),
            }
        }
    }

    #[test]
    fn percent_b_endpoints() {
        let bb = BollingerResult {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
            width: 20.0,
        };
        assert_eq!(bb.percent_b(90.0), 0.0);
        assert_eq!(bb.percent_b(110.0), 1.0);
        assert_eq!(bb.half_width(), 10.0);
    }
}
