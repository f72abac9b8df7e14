//! Signal table — the per-bar output of a strategy.
//!
//! One row per input bar, aligned by position and carrying the input dates
//! unmodified. Fixed columns cover the action (`signal`), bookkeeping
//! (`position`, `active_positions`) and sizing (`trade_weight`); any
//! strategy-specific series (RSI, CCI, ...) ride along as named indicator
//! columns.

use crate::domain::Bar;
use crate::indicators::IndicatorValues;
use chrono::NaiveDate;

/// Discrete action recommendation for one bar.
pub const SIGNAL_BUY: i32 = 1;
pub const SIGNAL_HOLD: i32 = 0;
pub const SIGNAL_SELL: i32 = -1;

/// Columnar table of per-bar signals, same length as the input bar series.
#[derive(Debug, Clone, Default)]
pub struct SignalTable {
    /// Input dates, preserved in order.
    pub dates: Vec<NaiveDate>,
    /// -1 = exit, 0 = hold, +1 = enter.
    pub signal: Vec<i32>,
    /// Current-position bookkeeping. The RSI mean-reversion strategy leaves
    /// this at 0 (reserved); single-position strategies write 0/1 here.
    pub position: Vec<i32>,
    /// Signed fraction of capital to allocate on this bar; 0 when no action.
    pub trade_weight: Vec<f64>,
    /// Count of open positions, carried forward and stepped ±1 on entry/exit.
    pub active_positions: Vec<i32>,
    /// Strategy-specific columns (e.g., "rsi").
    pub indicators: IndicatorValues,
}

impl SignalTable {
    /// Build an all-default table aligned with `bars`: hold everywhere,
    /// zero positions, no indicator columns.
    pub fn aligned_with(bars: &[Bar]) -> Self {
        let n = bars.len();
        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            signal: vec![SIGNAL_HOLD; n],
            position: vec![0; n],
            trade_weight: vec![0.0; n],
            active_positions: vec![0; n],
            indicators: IndicatorValues::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Full series for a named indicator column.
    pub fn indicator(&self, name: &str) -> Option<&[f64]> {
        self.indicators.get_series(name)
    }
}
