// =============================================================================
// Swing Point Detection
// =============================================================================
//
// Index `i` (window <= i < len - window) is a swing high when `series[i]` is
// the maximum of the closed neighbourhood [i - window, i + window], and a
// swing low when it is the minimum.  Equality counts, so a flat plateau
// yields one swing point per index on the plateau.

use serde::{Deserialize, Serialize};

/// A local extremum in a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub value: f64,
}

pub fn find_swing_highs(series: &[f64], window: usize) -> Vec<SwingPoint> {
    find_extrema(series, window, |candidate, other| candidate >= other)
}

pub fn find_swing_lows(series: &[f64], window: usize) -> Vec<SwingPoint> {
    find_extrema(series, window, |candidate, other| candidate <= other)
}

fn find_extrema(series: &[f64], window: usize, dominates: impl Fn(f64, f64) -> bool) -> Vec<SwingPoint> {
    if series.len() <= 2 * window {
        return Vec::new();
    }

    (window..series.len() - window)
        .filter(|&i| {
            let value = series[i];
            series[i - window..=i + window]
                .iter()
                .all(|&other| dominates(value, other))
        })
        .map(|i| SwingPoint {
            index: i,
            value: series[i],
        })
        .collect()
}
