//! Polygon.io data client.
//!
//! Fetches daily aggregate bars from the v2 aggs endpoint with bounded
//! retries and exponential backoff. The API key comes from the
//! `POLYGON_API_KEY` environment variable unless supplied explicitly.

use super::DataError;
use crate::domain::Bar;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.polygon.io";

/// Aggs response envelope.
#[derive(Debug, Deserialize)]
struct AggsResponse {
    status: Option<String>,
    results: Option<Vec<AggBar>>,
}

/// One aggregate bar; field names follow the Polygon wire format.
#[derive(Debug, Deserialize)]
struct AggBar {
    /// Unix timestamp, milliseconds.
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

/// Blocking Polygon.io client for daily bars.
pub struct PolygonClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Build a client from the `POLYGON_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, DataError> {
        match std::env::var("POLYGON_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(DataError::MissingApiKey),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn aggs_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v2/aggs/ticker/{symbol}/range/1/day/{start}/{end}\
             ?adjusted=true&sort=asc&limit=50000&apiKey={}",
            self.base_url, self.api_key
        )
    }

    /// Fetch daily bars for a symbol over an inclusive date range.
    pub fn get_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let url = self.aggs_url(symbol, start, end);
        let mut last_err: Option<DataError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::warn!(symbol, attempt, ?delay, "retrying Polygon fetch");
                std::thread::sleep(delay);
            }

            match self.fetch_once(symbol, &url) {
                Ok(bars) => return Ok(bars),
                // Empty data is definitive, not retryable.
                Err(err @ DataError::EmptyResponse { .. }) => return Err(err),
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or(DataError::EmptyResponse {
            symbol: symbol.to_string(),
        }))
    }

    fn fetch_once(&self, symbol: &str, url: &str) -> Result<Vec<Bar>, DataError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let parsed: AggsResponse = response.json()?;
        parse_aggs(symbol, parsed)
    }
}

fn parse_aggs(symbol: &str, response: AggsResponse) -> Result<Vec<Bar>, DataError> {
    if let Some(status) = &response.status {
        if status == "ERROR" {
            return Err(DataError::BadResponse {
                symbol: symbol.to_string(),
                reason: "status ERROR".into(),
            });
        }
    }

    let results = response.results.unwrap_or_default();
    if results.is_empty() {
        return Err(DataError::EmptyResponse {
            symbol: symbol.to_string(),
        });
    }

    let mut bars = Vec::with_capacity(results.len());
    for agg in results {
        let date = DateTime::from_timestamp_millis(agg.t)
            .ok_or_else(|| DataError::BadResponse {
                symbol: symbol.to_string(),
                reason: format!("bad timestamp {}", agg.t),
            })?
            .date_naive();
        bars.push(Bar {
            date,
            open: agg.o,
            high: agg.h,
            low: agg.l,
            close: agg.c,
            volume: agg.v,
        });
    }
    Ok(bars)
}
