//! On-Balance Volume (OBV).
//!
//! Cumulative volume signed by close-to-close direction: volume is added on
//! up days, subtracted on down days, and carried unchanged on flat days.
//! OBV starts at 0 on the first bar.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "obv"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![0.0; n];
        for i in 1..n {
            let delta = if bars[i].close > bars[i - 1].close {
                bars[i].volume
            } else if bars[i].close < bars[i - 1].close {
                -bars[i].volume
            } else {
                0.0
            };
            result[i] = result[i - 1] + delta;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn obv_starts_at_zero() {
        let bars = make_bars(&[10.0]);
        assert_eq!(Obv::new().compute(&bars), vec![0.0]);
    }

    #[test]
    fn obv_accumulates_by_direction() {
        // up, down, flat → +1000, -1000, +0
        let bars = make_bars(&[10.0, 11.0, 10.0, 10.0]);
        let series = Obv::new().compute(&bars);
        assert_eq!(series, vec![0.0, 1000.0, 0.0, 0.0]);
    }

    #[test]
    fn obv_monotonic_rally() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let series = Obv::new().compute(&bars);
        assert_eq!(series, vec![0.0, 1000.0, 2000.0, 3000.0]);
    }
}
