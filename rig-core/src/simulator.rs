//! Trade simulator — turns a signal table and bar series into trades,
//! an equity curve, and performance metrics.
//!
//! Execution model is deliberately simple: one open position at a time,
//! full-balance allocation at the close of the signal bar, stop-loss and
//! target levels attached at entry and resolved against the final close.
//! The reported final balance is cash only; an unresolved open position
//! shows up in the equity curve but not in the cash balance.

use crate::domain::{Bar, ExitReason, Trade, TradeStatus};
use crate::strategy::{SignalTable, SIGNAL_BUY, SIGNAL_SELL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate performance statistics for one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_trades: usize,
    /// Fraction of closed trades with positive P/L; 0 when no trades closed.
    pub win_rate: f64,
    /// Gross gains / gross losses; infinite when there are no losses.
    pub profit_factor: f64,
    /// Worst peak-to-trough equity decline, as a non-positive fraction.
    pub max_drawdown: f64,
}

/// Everything a simulation run produces.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    /// Position still open after the last bar, if any.
    pub open_position: Option<Trade>,
    pub final_balance: f64,
    /// Mark-to-market equity per bar (cash + open position value).
    pub equity_curve: Vec<f64>,
    pub metrics: Metrics,
}

/// Signal-driven long-only trade simulator.
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    initial_balance: f64,
    /// Stop-loss distance as a fraction of entry price.
    risk_pct: f64,
    /// Target distance as a fraction of entry price.
    reward_pct: f64,
}

impl Default for TradeSimulator {
    fn default() -> Self {
        Self::new(10_000.0)
    }
}

impl TradeSimulator {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            risk_pct: 0.02,
            reward_pct: 0.05,
        }
    }

    /// Run the simulation. `signals` and `bars` must be the same length
    /// (caller contract, same as the strategy output invariant).
    pub fn run(&self, signals: &SignalTable, bars: &[Bar]) -> SimulationResult {
        let mut balance = self.initial_balance;
        let mut open: Option<Trade> = None;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len());

        for (i, bar) in bars.iter().enumerate() {
            let price = bar.close;
            match signals.signal[i] {
                SIGNAL_BUY if open.is_none() => {
                    open = Some(self.enter(&mut balance, price, bar.date));
                }
                SIGNAL_SELL => {
                    if let Some(trade) = open.take() {
                        trades.push(close_trade(
                            trade,
                            &mut balance,
                            price,
                            bar.date,
                            ExitReason::Signal,
                        ));
                    }
                }
                _ => {}
            }

            let open_value = open.as_ref().map_or(0.0, |t| t.shares * price);
            equity_curve.push(balance + open_value);
        }

        // Resolve protective levels against the final close.
        if let (Some(trade), Some(last)) = (open.take(), bars.last()) {
            match self.settle_open(trade, &mut balance, last) {
                Settled::Closed(trade) => {
                    if let Some(eq) = equity_curve.last_mut() {
                        *eq = balance;
                    }
                    trades.push(trade);
                }
                Settled::StillOpen(trade) => open = Some(trade),
            }
        }

        let metrics = self.compute_metrics(&trades, balance, &equity_curve);
        SimulationResult {
            trades,
            open_position: open,
            final_balance: balance,
            equity_curve,
            metrics,
        }
    }

    fn enter(&self, balance: &mut f64, price: f64, date: NaiveDate) -> Trade {
        let shares = *balance / price;
        *balance -= shares * price;
        tracing::info!(shares, price, %date, "ENTER");
        Trade {
            entry_date: date,
            entry_price: price,
            shares,
            exit_date: None,
            exit_price: None,
            stop_loss: price * (1.0 - self.risk_pct),
            target_price: price * (1.0 + self.reward_pct),
            status: TradeStatus::Open,
            reason: None,
            unrealized_pnl: 0.0,
        }
    }

    fn settle_open(&self, mut trade: Trade, balance: &mut f64, last: &Bar) -> Settled {
        if last.close <= trade.stop_loss {
            let exit = trade.stop_loss;
            Settled::Closed(close_trade(
                trade,
                balance,
                exit,
                last.date,
                ExitReason::StopLoss,
            ))
        } else if last.close >= trade.target_price {
            let exit = trade.target_price;
            Settled::Closed(close_trade(
                trade,
                balance,
                exit,
                last.date,
                ExitReason::Target,
            ))
        } else {
            trade.unrealized_pnl = (last.close - trade.entry_price) * trade.shares;
            Settled::StillOpen(trade)
        }
    }

    fn compute_metrics(&self, trades: &[Trade], balance: f64, equity_curve: &[f64]) -> Metrics {
        Metrics {
            initial_balance: self.initial_balance,
            final_balance: balance,
            total_trades: trades.len(),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            max_drawdown: max_drawdown(equity_curve),
        }
    }
}

enum Settled {
    Closed(Trade),
    StillOpen(Trade),
}

fn close_trade(
    mut trade: Trade,
    balance: &mut f64,
    exit_price: f64,
    exit_date: NaiveDate,
    reason: ExitReason,
) -> Trade {
    trade.exit_date = Some(exit_date);
    trade.exit_price = Some(exit_price);
    trade.status = TradeStatus::Closed;
    trade.reason = Some(reason);
    *balance += trade.shares * exit_price;
    tracing::info!(
        shares = trade.shares,
        exit_price,
        pnl = trade.pnl().unwrap_or(0.0),
        reason = reason.as_str(),
        "EXIT"
    );
    trade
}

/// Fraction of closed trades with positive P/L.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Closed)
        .collect();
    if closed.is_empty() {
        return 0.0;
    }
    let winners = closed.iter().filter(|t| t.is_winner()).count();
    winners as f64 / closed.len() as f64
}

/// Gross gains divided by gross losses. Infinite when nothing was lost.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let mut gains = 0.0;
    let mut losses = 0.0;
    for trade in trades {
        if let Some(pnl) = trade.pnl() {
            if pnl > 0.0 {
                gains += pnl;
            } else {
                losses += pnl.abs();
            }
        }
    }
    if losses > 0.0 {
        gains / losses
    } else {
        f64::INFINITY
    }
}

/// Worst peak-to-trough decline of the equity curve, as a fraction <= 0.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            worst = worst.min((equity - peak) / peak);
        }
    }
    worst
}
