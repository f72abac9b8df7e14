//! Serializable run configuration (TOML).
//!
//! A `RunConfig` captures everything needed to reproduce a backtest:
//! the symbol, where bars come from, which strategy with which
//! parameters, and the capital assumptions.

use crate::strategy::{CciObvAtr, RsiMeanReversion, Strategy, StrategyConfig, StrategyError};
use crate::synthetic::GbmConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Full configuration for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Ticker symbol (labels output artifacts; synthetic runs may use any tag).
    pub symbol: String,

    /// Starting capital.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,

    /// Directory for artifacts (trades.csv, metrics.json, dashboard.html).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Where the bar series comes from.
    pub data: DataSourceConfig,

    /// Strategy and its parameters.
    pub strategy: StrategySpec,
}

fn default_initial_balance() -> f64 {
    10_000.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

/// Bar source (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceConfig {
    /// Load bars from a CSV file.
    Csv { path: PathBuf },

    /// Fetch daily bars from Polygon.io (API key from the environment).
    Polygon { start: NaiveDate, end: NaiveDate },

    /// Generate a synthetic GBM path.
    Synthetic { gbm: GbmConfig, seed: u64 },
}

/// Strategy selection (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategySpec {
    /// Long-only RSI mean reversion with stacked entries.
    RsiMeanReversion {
        oversold: f64,
        overbought: f64,
        rsi_period: usize,
        max_positions: i32,
        position_size: f64,
    },

    /// CCI signal with OBV confirmation and ATR floor.
    CciObvAtr {
        cci_threshold: f64,
        cci_period: usize,
        atr_period: usize,
        atr_min: f64,
    },
}

impl RunConfig {
    /// Load and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Build the configured strategy.
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        let shared = StrategyConfig {
            initial_balance: self.initial_balance,
            ..StrategyConfig::default()
        };
        match &self.strategy {
            StrategySpec::RsiMeanReversion {
                oversold,
                overbought,
                rsi_period,
                max_positions,
                position_size,
            } => Ok(Box::new(RsiMeanReversion::new(
                *oversold,
                *overbought,
                *rsi_period,
                *max_positions,
                *position_size,
                shared,
            )?)),
            StrategySpec::CciObvAtr {
                cci_threshold,
                cci_period,
                atr_period,
                atr_min,
            } => Ok(Box::new(CciObvAtr::new(
                *cci_threshold,
                *cci_period,
                *atr_period,
                *atr_min,
                shared,
            )?)),
        }
    }
}
