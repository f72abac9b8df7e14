//! Long-only RSI mean-reversion strategy with scaled position entries.
//!
//! Entry: RSI below the oversold threshold, strength proportional to how far
//! below. Exit: RSI above the overbought threshold while positions are open,
//! strength proportional to how far above. Up to `max_positions` entries may
//! be stacked; the running count is carried forward bar to bar.
//!
//! Note the sizing asymmetry: entry weight is `position_size * strength`,
//! exit weight is `-strength` with no `position_size` factor. This mirrors
//! the behavior the rig has always had and is pinned by a test; changing it
//! is a deliberate, visible decision.

use super::signals::{SignalTable, SIGNAL_BUY, SIGNAL_SELL};
use super::{Strategy, StrategyConfig, StrategyError};
use crate::domain::Bar;
use crate::indicators::rsi_at;

#[derive(Debug, Clone)]
pub struct RsiMeanReversion {
    oversold: f64,
    overbought: f64,
    rsi_period: usize,
    max_positions: i32,
    position_size: f64,
    pub config: StrategyConfig,
}

impl RsiMeanReversion {
    /// Build a strategy, validating parameters eagerly.
    pub fn new(
        oversold: f64,
        overbought: f64,
        rsi_period: usize,
        max_positions: i32,
        position_size: f64,
        config: StrategyConfig,
    ) -> Result<Self, StrategyError> {
        if oversold >= overbought {
            return Err(StrategyError::InvalidThresholds {
                oversold,
                overbought,
            });
        }
        if rsi_period == 0 {
            return Err(StrategyError::InvalidPeriod { period: rsi_period });
        }
        if position_size <= 0.0 {
            return Err(StrategyError::InvalidPositionSize {
                size: position_size,
            });
        }
        if max_positions < 1 {
            return Err(StrategyError::InvalidMaxPositions { max_positions });
        }
        Ok(Self {
            oversold,
            overbought,
            rsi_period,
            max_positions,
            position_size,
            config,
        })
    }

    /// Standard parameters: 30/70 thresholds, 14-bar RSI, up to 5 stacked
    /// entries at 10% of capital each.
    pub fn default_params() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            rsi_period: 14,
            max_positions: 5,
            position_size: 0.1,
            config: StrategyConfig::default(),
        }
    }

    pub fn rsi_period(&self) -> usize {
        self.rsi_period
    }

    pub fn max_positions(&self) -> i32 {
        self.max_positions
    }

    pub fn position_size(&self) -> f64 {
        self.position_size
    }
}

impl Strategy for RsiMeanReversion {
    fn name(&self) -> &str {
        "rsi_mean_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.rsi_period
    }

    fn generate_signals(&self, bars: &[Bar]) -> SignalTable {
        tracing::info!(
            strategy = self.name(),
            bars = bars.len(),
            rsi_period = self.rsi_period,
            "generating signals"
        );

        let n = bars.len();
        let mut table = SignalTable::aligned_with(bars);
        let mut rsi_col = vec![f64::NAN; n];

        for i in self.rsi_period..n {
            // Causal slice only: the RSI at bar i never sees bars after i.
            let rsi = rsi_at(&bars[..=i], self.rsi_period);
            rsi_col[i] = rsi;

            let mut active = table.active_positions[i - 1];

            if active < self.max_positions && rsi < self.oversold {
                // Scale into the position: the deeper below the threshold,
                // the closer to a full-strength entry.
                let strength = (self.oversold - rsi) / self.oversold;
                if strength > 0.0 {
                    table.signal[i] = SIGNAL_BUY;
                    table.trade_weight[i] = self.position_size * strength;
                    active += 1;
                }
            } else if rsi > self.overbought && active > 0 {
                let strength = (rsi - self.overbought) / (100.0 - self.overbought);
                if strength > 0.0 {
                    table.signal[i] = SIGNAL_SELL;
                    // Exit weight is intentionally not scaled by position_size.
                    table.trade_weight[i] = -strength;
                    active -= 1;
                }
            }

            table.active_positions[i] = active;
        }

        table.indicators.insert("rsi", rsi_col);
        table
    }
}
