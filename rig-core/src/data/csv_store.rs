//! CSV persistence for bar series.
//!
//! Flat files with a `date,open,high,low,close,volume` header, dates in
//! ISO format. This is the rig's only storage format; fetched data is
//! saved here and backtests load from here.

use super::DataError;
use crate::domain::Bar;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read bars from any reader. Rejects series that are not date-ordered.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for record in csv_reader.deserialize() {
        let bar: Bar = record?;
        bars.push(bar);
    }
    if bars.windows(2).any(|pair| pair[1].date <= pair[0].date) {
        return Err(DataError::UnorderedBars {
            path: "<reader>".into(),
        });
    }
    Ok(bars)
}

/// Load bars from a CSV file.
pub fn load_bars(path: impl AsRef<Path>) -> Result<Vec<Bar>, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_bars(file).map_err(|err| match err {
        DataError::UnorderedBars { .. } => DataError::UnorderedBars {
            path: path.display().to_string(),
        },
        other => other,
    })
}

/// Write bars to any writer as CSV.
pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for bar in bars {
        csv_writer.serialize(bar)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save bars to a CSV file, creating parent directories as needed.
pub fn save_bars(path: impl AsRef<Path>, bars: &[Bar]) -> Result<(), DataError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_bars(file, bars)
}
