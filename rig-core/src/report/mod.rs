//! Reporting and export — CSV trade tape, JSON metrics, HTML dashboard.

pub mod dashboard;

pub use dashboard::render_dashboard;

use crate::domain::{Bar, Trade};
use crate::simulator::SimulationResult;
use crate::strategy::SignalTable;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from artifact generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv output is not valid utf-8")]
    InvalidUtf8,
}

/// Export a trade list as CSV.
///
/// Columns: entry_date, entry_price, shares, exit_date, exit_price,
/// stop_loss, target_price, status, reason, pnl
pub fn export_trades_csv(trades: &[Trade]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entry_date",
        "entry_price",
        "shares",
        "exit_date",
        "exit_price",
        "stop_loss",
        "target_price",
        "status",
        "reason",
        "pnl",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.entry_date.to_string(),
            &format!("{:.6}", t.entry_price),
            &format!("{:.6}", t.shares),
            &t.exit_date.map(|d| d.to_string()).unwrap_or_default(),
            &t.exit_price.map(|p| format!("{p:.6}")).unwrap_or_default(),
            &format!("{:.6}", t.stop_loss),
            &format!("{:.6}", t.target_price),
            &format!("{:?}", t.status),
            t.reason.map(|r| r.as_str()).unwrap_or(""),
            &t.pnl().map(|p| format!("{p:.2}")).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().map_err(|_| ReportError::InvalidUtf8)?;
    String::from_utf8(data).map_err(|_| ReportError::InvalidUtf8)
}

/// Serialize the run metrics to pretty JSON.
pub fn export_metrics_json(result: &SimulationResult) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&result.metrics)?)
}

/// Write all artifacts of a run under `output_dir`:
/// `trades.csv`, `metrics.json`, `dashboard.html`.
///
/// Returns the path of the dashboard for display to the user.
pub fn save_artifacts(
    output_dir: impl AsRef<Path>,
    symbol: &str,
    bars: &[Bar],
    signals: &SignalTable,
    result: &SimulationResult,
) -> Result<PathBuf, ReportError> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    std::fs::write(
        output_dir.join("trades.csv"),
        export_trades_csv(&result.trades)?,
    )?;
    std::fs::write(
        output_dir.join("metrics.json"),
        export_metrics_json(result)?,
    )?;

    let dashboard_path = output_dir.join("dashboard.html");
    std::fs::write(
        &dashboard_path,
        render_dashboard(symbol, bars, signals, result),
    )?;

    tracing::info!(dir = %output_dir.display(), "artifacts written");
    Ok(dashboard_path)
}
