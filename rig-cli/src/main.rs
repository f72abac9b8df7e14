//! Backtest rig CLI.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file, write artifacts
//! - `fetch` — download daily bars from Polygon.io into a CSV file
//! - `montecarlo` — evaluate the RSI strategy over many GBM paths

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rig_core::config::{DataSourceConfig, RunConfig};
use rig_core::data::{load_bars, save_bars, PolygonClient};
use rig_core::montecarlo::{run_paths, summarize, MonteCarloConfig};
use rig_core::report::save_artifacts;
use rig_core::simulator::TradeSimulator;
use rig_core::strategy::RsiMeanReversion;
use rig_core::synthetic::{generate_gbm_bars_seeded, GbmConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rig", about = "Backtest rig — RSI mean-reversion backtesting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to the TOML run configuration.
        #[arg(long)]
        config: PathBuf,
    },
    /// Download daily bars from Polygon.io and save as CSV.
    Fetch {
        /// Ticker symbol (e.g. AAPL).
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Output CSV path. Defaults to data/<symbol>.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the RSI strategy over many synthetic GBM paths.
    Montecarlo {
        /// Number of paths.
        #[arg(long, default_value_t = 500)]
        paths: usize,

        /// Trading days per path.
        #[arg(long, default_value_t = 252)]
        days: usize,

        /// Daily drift.
        #[arg(long, default_value_t = 0.0004)]
        drift: f64,

        /// Daily volatility.
        #[arg(long, default_value_t = 0.012)]
        volatility: f64,

        /// Master seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Starting capital per path.
        #[arg(long, default_value_t = 10_000.0)]
        balance: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config } => cmd_run(&config),
        Commands::Fetch {
            symbol,
            start,
            end,
            out,
        } => cmd_fetch(&symbol, start, end, out),
        Commands::Montecarlo {
            paths,
            days,
            drift,
            volatility,
            seed,
            balance,
        } => cmd_montecarlo(paths, days, drift, volatility, seed, balance),
    }
}

fn cmd_run(config_path: &PathBuf) -> Result<()> {
    let started = Instant::now();
    let config = RunConfig::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    tracing::info!(symbol = %config.symbol, "starting backtest");

    let bars = match &config.data {
        DataSourceConfig::Csv { path } => load_bars(path)
            .with_context(|| format!("failed to load bars from {}", path.display()))?,
        DataSourceConfig::Polygon { start, end } => {
            let client = PolygonClient::from_env()?;
            client
                .get_daily_bars(&config.symbol, *start, *end)
                .with_context(|| format!("failed to fetch bars for {}", config.symbol))?
        }
        DataSourceConfig::Synthetic { gbm, seed } => generate_gbm_bars_seeded(gbm, *seed),
    };
    anyhow::ensure!(!bars.is_empty(), "bar series is empty");

    let strategy = config.build_strategy()?;
    let signals = strategy.generate_signals(&bars);

    let simulator = TradeSimulator::new(config.initial_balance);
    let result = simulator.run(&signals, &bars);

    let dashboard = save_artifacts(&config.output_dir, &config.symbol, &bars, &signals, &result)?;
    let runtime = started.elapsed();

    let metrics = &result.metrics;
    println!("\nBacktest Results:");
    println!("Initial Balance: ${:.2}", metrics.initial_balance);
    println!("Final Balance: ${:.2}", metrics.final_balance);
    println!(
        "Total Return: {:.1}%",
        (metrics.final_balance / metrics.initial_balance - 1.0) * 100.0
    );
    println!("Win Rate: {:.1}%", metrics.win_rate * 100.0);
    println!("Total Trades: {}", metrics.total_trades);
    println!("Profit Factor: {:.2}", metrics.profit_factor);
    println!("Max Drawdown: {:.1}%", metrics.max_drawdown * 100.0);
    println!("Runtime: {:.2} seconds", runtime.as_secs_f64());
    println!("\nDashboard saved to: {}", dashboard.display());
    Ok(())
}

fn cmd_fetch(symbol: &str, start: NaiveDate, end: NaiveDate, out: Option<PathBuf>) -> Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(format!("data/{}.csv", symbol.to_lowercase())));
    let client = PolygonClient::from_env()?;
    let bars = client
        .get_daily_bars(symbol, start, end)
        .with_context(|| format!("failed to fetch bars for {symbol}"))?;
    save_bars(&out, &bars)?;
    println!("Saved {} bars to {}", bars.len(), out.display());
    Ok(())
}

fn cmd_montecarlo(
    paths: usize,
    days: usize,
    drift: f64,
    volatility: f64,
    seed: u64,
    balance: f64,
) -> Result<()> {
    let started = Instant::now();
    let strategy = RsiMeanReversion::default_params();
    let simulator = TradeSimulator::new(balance);
    let config = MonteCarloConfig {
        paths,
        master_seed: seed,
        gbm: GbmConfig {
            drift,
            volatility,
            days,
            ..GbmConfig::default()
        },
    };

    let outcomes = run_paths(&strategy, &simulator, &config);
    let summary = summarize(&outcomes, balance);
    let runtime = started.elapsed();

    println!("\nMonte Carlo Summary ({} paths):", summary.paths);
    println!("Mean Final Balance: ${:.2}", summary.mean_final_balance);
    println!("Median Final Balance: ${:.2}", summary.median_final_balance);
    println!(
        "5th-95th Percentile: ${:.2} - ${:.2}",
        summary.p5_final_balance, summary.p95_final_balance
    );
    println!(
        "Profitable Paths: {:.1}%",
        summary.profitable_fraction * 100.0
    );
    println!("Mean Max Drawdown: {:.1}%", summary.mean_max_drawdown * 100.0);
    println!("Runtime: {:.2} seconds", runtime.as_secs_f64());
    Ok(())
}
