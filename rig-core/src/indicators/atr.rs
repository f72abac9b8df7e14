//! Average True Range (ATR), simple-moving-average flavor.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! TR[0] falls back to high-low (no previous close).
//! ATR is a plain rolling mean of TR over `period`.

use super::Indicator;
use crate::domain::Bar;

/// Compute the True Range series from bars.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    if n == 0 {
        return tr;
    }

    tr[0] = bars[0].high - bars[0].low;
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        let tr = true_range(bars);
        let mut window_sum: f64 = tr[..self.period].iter().sum();
        result[self.period - 1] = window_sum / self.period as f64;
        for i in self.period..n {
            window_sum += tr[i] - tr[i - self.period];
            result[i] = window_sum / self.period as f64;
        }
        result
    }
}
