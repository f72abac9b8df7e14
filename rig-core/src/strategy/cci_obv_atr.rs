//! CCI trend signal with OBV confirmation and an ATR volatility floor.
//!
//! CCI provides the actionable signal, OBV confirms that volume backs the
//! move, and ATR gates out dead markets. Single-position bookkeeping: the
//! `position` column holds 0 or 1 and entries are skipped while long.

use super::signals::{SignalTable, SIGNAL_BUY, SIGNAL_SELL};
use super::{Strategy, StrategyConfig, StrategyError};
use crate::domain::Bar;
use crate::indicators::{Atr, Cci, Indicator, Obv};

#[derive(Debug, Clone)]
pub struct CciObvAtr {
    cci_threshold: f64,
    cci_period: usize,
    atr_period: usize,
    /// Bars with ATR below this are skipped entirely.
    atr_min: f64,
    pub config: StrategyConfig,
}

impl CciObvAtr {
    pub fn new(
        cci_threshold: f64,
        cci_period: usize,
        atr_period: usize,
        atr_min: f64,
        config: StrategyConfig,
    ) -> Result<Self, StrategyError> {
        if cci_period == 0 {
            return Err(StrategyError::InvalidPeriod { period: cci_period });
        }
        if atr_period == 0 {
            return Err(StrategyError::InvalidPeriod { period: atr_period });
        }
        Ok(Self {
            cci_threshold,
            cci_period,
            atr_period,
            atr_min,
            config,
        })
    }

    /// Standard parameters: ±100 CCI band, 20-bar CCI, 14-bar ATR.
    pub fn default_params() -> Self {
        Self {
            cci_threshold: 100.0,
            cci_period: 20,
            atr_period: 14,
            atr_min: 1.0,
            config: StrategyConfig::default(),
        }
    }
}

impl Strategy for CciObvAtr {
    fn name(&self) -> &str {
        "cci_obv_atr"
    }

    fn warmup_bars(&self) -> usize {
        self.cci_period.max(self.atr_period)
    }

    fn generate_signals(&self, bars: &[Bar]) -> SignalTable {
        tracing::info!(
            strategy = self.name(),
            bars = bars.len(),
            "generating signals"
        );

        let n = bars.len();
        let mut table = SignalTable::aligned_with(bars);

        let cci = Cci::new(self.cci_period).compute(bars);
        let obv = Obv::new().compute(bars);
        let atr = Atr::new(self.atr_period).compute(bars);

        for i in self.warmup_bars()..n {
            if cci[i].is_nan() || atr[i].is_nan() {
                continue;
            }
            if atr[i] < self.atr_min {
                continue;
            }

            let obv_diff = obv[i] - obv[i - 1];
            let prev_position = table.position[i - 1];

            if prev_position == 0 {
                if cci[i] > self.cci_threshold && obv_diff > 0.0 {
                    table.signal[i] = SIGNAL_BUY;
                    table.position[i] = 1;
                }
            } else if cci[i] < -self.cci_threshold && obv_diff < 0.0 {
                table.signal[i] = SIGNAL_SELL;
                table.position[i] = 0;
            } else {
                table.position[i] = 1;
            }
        }

        table.indicators.insert("cci", cci);
        table.indicators.insert("obv", obv);
        table.indicators.insert("atr", atr);
        table
    }
}
