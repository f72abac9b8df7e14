//! Strategy trait and shared strategy configuration.
//!
//! A strategy is a pure transformation from a bar series to an equal-length
//! `SignalTable`. All decision state lives inside a single
//! `generate_signals` call; nothing is carried between calls, so strategies
//! are safe to share across threads and reuse across independent inputs.

pub mod cci_obv_atr;
pub mod rsi_mean_reversion;
pub mod signals;

pub use cci_obv_atr::CciObvAtr;
pub use rsi_mean_reversion::RsiMeanReversion;
pub use signals::{SignalTable, SIGNAL_BUY, SIGNAL_HOLD, SIGNAL_SELL};

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capital assumptions shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Starting capital in account currency.
    pub initial_balance: f64,
    /// Fraction of balance risked per trade.
    pub risk_per_trade: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            risk_per_trade: 0.02,
        }
    }
}

/// Construction-time parameter validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("oversold threshold {oversold} must be below overbought threshold {overbought}")]
    InvalidThresholds { oversold: f64, overbought: f64 },

    #[error("indicator period must be >= 1, got {period}")]
    InvalidPeriod { period: usize },

    #[error("position size must be > 0, got {size}")]
    InvalidPositionSize { size: f64 },

    #[error("max positions must be >= 1, got {max_positions}")]
    InvalidMaxPositions { max_positions: i32 },
}

/// A signal-generating strategy.
///
/// Implementations must be strictly causal: row i of the output may depend
/// only on `bars[0..=i]`.
pub trait Strategy: Send + Sync {
    /// Stable machine-readable name (e.g., "rsi_mean_reversion").
    fn name(&self) -> &str;

    /// Number of leading bars left at table defaults (warmup).
    fn warmup_bars(&self) -> usize;

    /// Produce a signal table aligned 1:1 with `bars`.
    fn generate_signals(&self, bars: &[Bar]) -> SignalTable;
}
