//! Domain types: bars and trades.

pub mod bar;
pub mod trade;

pub use bar::Bar;
pub use trade::{ExitReason, Trade, TradeStatus};
