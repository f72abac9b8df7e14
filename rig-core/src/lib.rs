//! Backtest rig core — strategies, simulation, data, reporting.
//!
//! The heart of the rig is the strategy layer: a `Strategy` turns an
//! ordered bar series into an equal-length `SignalTable` of discrete
//! enter/exit/hold actions with position sizing. Around it sit the
//! collaborators:
//! - Indicators (RSI, CCI, OBV, ATR) with a NaN warmup convention
//! - A signal-driven trade simulator producing trades, equity, metrics
//! - Synthetic GBM paths and a deterministic Monte Carlo runner
//! - CSV persistence and a Polygon.io fetcher
//! - Artifact export: trade tape CSV, metrics JSON, HTML dashboard

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod montecarlo;
pub mod report;
pub mod simulator;
pub mod strategy;
pub mod synthetic;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types handed across threads by the Monte
    /// Carlo runner are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<strategy::SignalTable>();
        require_sync::<strategy::SignalTable>();
        require_send::<strategy::RsiMeanReversion>();
        require_sync::<strategy::RsiMeanReversion>();
        require_send::<strategy::CciObvAtr>();
        require_sync::<strategy::CciObvAtr>();
        require_send::<simulator::TradeSimulator>();
        require_sync::<simulator::TradeSimulator>();
        require_send::<simulator::Metrics>();
        require_sync::<simulator::Metrics>();
        require_send::<montecarlo::MonteCarloConfig>();
        require_sync::<montecarlo::MonteCarloConfig>();
    }

    /// Architecture contract: strategies cannot see portfolio state.
    ///
    /// `generate_signals` takes only the bar series — the simulator's
    /// balance never reaches the strategy, so signals cannot peek at
    /// execution results. The trait signature enforces this; the test
    /// documents it and breaks loudly if the signature grows.
    #[test]
    fn strategy_trait_has_no_portfolio_parameter() {
        fn _check_trait_object_builds(
            strategy: &dyn strategy::Strategy,
            bars: &[domain::Bar],
        ) -> strategy::SignalTable {
            strategy.generate_signals(bars)
        }
    }
}
