//! Trade record produced by the trade simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

/// Why a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Closed by a -1 strategy signal.
    Signal,
    /// Stop-loss level was breached.
    StopLoss,
    /// Target price was reached.
    Target,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Signal => "SIGNAL",
            ExitReason::StopLoss => "STOP-LOSS",
            ExitReason::Target => "TARGET",
        }
    }
}

/// A single long trade: entry, optional exit, and protective levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    /// Stop-loss level attached at entry.
    pub stop_loss: f64,
    /// Take-profit level attached at entry.
    pub target_price: f64,
    pub status: TradeStatus,
    pub reason: Option<ExitReason>,
    /// Mark-to-market P/L while the trade is still open.
    pub unrealized_pnl: f64,
}

impl Trade {
    /// Realized P/L for a closed trade; `None` while still open.
    pub fn pnl(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| (exit - self.entry_price) * self.shares)
    }

    /// True for a closed trade that exited above its entry price.
    pub fn is_winner(&self) -> bool {
        matches!(self.pnl(), Some(pnl) if pnl > 0.0)
    }
}
