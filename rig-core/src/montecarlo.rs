//! Monte Carlo study — run a strategy over many GBM paths in parallel.
//!
//! Per-path seeds are derived from the master seed with BLAKE3, so the
//! study is deterministic regardless of how rayon schedules the paths.

use crate::simulator::{Metrics, TradeSimulator};
use crate::strategy::Strategy;
use crate::synthetic::{generate_gbm_bars_seeded, GbmConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for a Monte Carlo study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub paths: usize,
    pub master_seed: u64,
    pub gbm: GbmConfig,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            paths: 500,
            master_seed: 42,
            gbm: GbmConfig::default(),
        }
    }
}

/// Outcome of one simulated path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathOutcome {
    pub path: usize,
    pub metrics: Metrics,
}

/// Distribution summary over all paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub paths: usize,
    pub mean_final_balance: f64,
    pub median_final_balance: f64,
    /// 5th percentile of final balances.
    pub p5_final_balance: f64,
    /// 95th percentile of final balances.
    pub p95_final_balance: f64,
    /// Fraction of paths that ended above the initial balance.
    pub profitable_fraction: f64,
    pub mean_max_drawdown: f64,
}

/// Derive a per-path seed from the master seed, order-independent.
fn path_seed(master_seed: u64, path: usize) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(&(path as u64).to_le_bytes());
    let hash = hasher.finalize();
    u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("8 bytes"))
}

/// Run `config.paths` GBM paths through the strategy and simulator.
///
/// Paths are evaluated in parallel; results come back in path order.
pub fn run_paths(
    strategy: &dyn Strategy,
    simulator: &TradeSimulator,
    config: &MonteCarloConfig,
) -> Vec<PathOutcome> {
    tracing::info!(
        paths = config.paths,
        days = config.gbm.days,
        strategy = strategy.name(),
        "running Monte Carlo study"
    );

    (0..config.paths)
        .into_par_iter()
        .map(|path| {
            let bars = generate_gbm_bars_seeded(&config.gbm, path_seed(config.master_seed, path));
            let signals = strategy.generate_signals(&bars);
            let result = simulator.run(&signals, &bars);
            PathOutcome {
                path,
                metrics: result.metrics,
            }
        })
        .collect()
}

/// Summarize path outcomes into a distribution view.
pub fn summarize(outcomes: &[PathOutcome], initial_balance: f64) -> MonteCarloSummary {
    let mut finals: Vec<f64> = outcomes.iter().map(|o| o.metrics.final_balance).collect();
    finals.sort_by(|a, b| a.total_cmp(b));

    let n = finals.len();
    let mean = if n == 0 {
        0.0
    } else {
        finals.iter().sum::<f64>() / n as f64
    };
    let profitable = finals.iter().filter(|&&f| f > initial_balance).count();
    let mean_dd = if n == 0 {
        0.0
    } else {
        outcomes.iter().map(|o| o.metrics.max_drawdown).sum::<f64>() / n as f64
    };

    MonteCarloSummary {
        paths: n,
        mean_final_balance: mean,
        median_final_balance: percentile(&finals, 0.50),
        p5_final_balance: percentile(&finals, 0.05),
        p95_final_balance: percentile(&finals, 0.95),
        profitable_fraction: if n == 0 {
            0.0
        } else {
            profitable as f64 / n as f64
        },
        mean_max_drawdown: mean_dd,
    }
}

/// Nearest-rank percentile of a sorted slice; 0.0 for empty input.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}
