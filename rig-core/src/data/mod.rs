//! Data layer: CSV persistence and HTTP fetch of daily bars.

pub mod csv_store;
pub mod polygon;

pub use csv_store::{load_bars, read_bars, save_bars, write_bars};
pub use polygon::PolygonClient;

use thiserror::Error;

/// Errors from the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("POLYGON_API_KEY is not set")]
    MissingApiKey,

    #[error("no bars returned for '{symbol}'")]
    EmptyResponse { symbol: String },

    #[error("unexpected response for '{symbol}': {reason}")]
    BadResponse { symbol: String, reason: String },

    #[error("bars for '{path}' are not ordered by date")]
    UnorderedBars { path: String },
}
