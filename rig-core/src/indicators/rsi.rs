//! Relative Strength Index (RSI), simple-moving-average flavor.
//!
//! Average gain and average loss are plain means over the most recent
//! `period` close-to-close differences (no Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Edge case: avg_loss == 0 → RSI = 100 exactly, no division.

use super::Indicator;
use crate::domain::Bar;

/// RSI of the last bar of a causal slice.
///
/// Requires at least `period + 1` bars; returns `f64::NAN` otherwise.
/// Only the trailing `period` differences of the slice contribute, so the
/// value for `bars[..=i]` depends on nothing after bar i.
pub fn rsi_at(bars: &[Bar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return f64::NAN;
    }

    let start = bars.len() - period;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in start..bars.len() {
        let delta = bars[i].close - bars[i - 1].close;
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        for i in self.period..n {
            result[i] = rsi_at(&bars[..=i], self.period);
        }
        result
    }
}
