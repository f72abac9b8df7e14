//! Commodity Channel Index (CCI).
//!
//! Typical price TP = (high + low + close) / 3.
//! CCI = (TP - SMA(TP)) / (0.015 * mean deviation), where mean deviation is
//! the average absolute distance of TP from the window mean, over `period`.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    name: String,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            period,
            name: format!("cci_{period}"),
        }
    }
}

impl Indicator for Cci {
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

        let tp: Vec<f64> = bars
            .iter()
            .map(|b| (b.high + b.low + b.close) / 3.0)
            .collect();

        for i in (self.period - 1)..n {
            let window = &tp[i + 1 - self.period..=i];
            let sma = window.iter().sum::<f64>() / self.period as f64;
            let mean_dev =
                window.iter().map(|v| (v - sma).abs()).sum::<f64>() / self.period as f64;
            if mean_dev == 0.0 {
                result[i] = 0.0;
            } else {
                result[i] = (tp[i] - sma) / (0.015 * mean_dev);
            }
        }

        result
    }
}
