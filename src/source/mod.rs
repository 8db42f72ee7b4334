//! Data sources feeding the refresh pipeline.
//!
//! A source returns every record on each call, same schema every time,
//! in the order that defines the categorical axis.

mod json_file;
mod memory;

#[cfg(feature = "http-source")]
mod http;

pub use json_file::JsonFileSource;
pub use memory::MemorySource;

#[cfg(feature = "http-source")]
pub use http::HttpJsonSource;

use serde_json::Value;

use crate::core::RawRecord;
use crate::error::{DashboardError, DashboardResult};

/// External tabular data source.
pub trait DataSource {
    /// Fetches all records. Implementations must bound how long this blocks.
    fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>>;
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>> {
        (**self).fetch()
    }
}

/// Decodes a JSON payload into records.
///
/// Accepts an array of objects, or a sheet range object whose `values` hold a
/// header row followed by data rows. Short rows are padded with empty cells,
/// which later fail numeric validation instead of shifting columns.
pub fn records_from_json(payload: Value) -> DashboardResult<Vec<RawRecord>> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(object) => Ok(object.into_iter().collect()),
                other => Err(DashboardError::InvalidData(format!(
                    "record {index} must be an object, got {other}"
                ))),
            })
            .collect(),
        Value::Object(mut object) => match object.remove("values") {
            Some(Value::Array(rows)) => records_from_value_rows(rows),
            _ => Err(DashboardError::InvalidData(
                "payload object must carry a `values` array".to_owned(),
            )),
        },
        other => Err(DashboardError::InvalidData(format!(
            "unsupported payload shape: {other}"
        ))),
    }
}

fn records_from_value_rows(rows: Vec<Value>) -> DashboardResult<Vec<RawRecord>> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let header = as_cells(header, 0)?
        .into_iter()
        .map(|cell| match cell {
            Value::String(name) => Ok(name.trim().to_owned()),
            other => Err(DashboardError::InvalidData(format!(
                "header cell must be text, got {other}"
            ))),
        })
        .collect::<DashboardResult<Vec<String>>>()?;

    rows.enumerate()
        .map(|(index, row)| {
            let mut cells = as_cells(row, index + 1)?.into_iter();
            Ok(header
                .iter()
                .map(|name| {
                    let cell = cells.next().unwrap_or_else(|| Value::String(String::new()));
                    (name.clone(), cell)
                })
                .collect())
        })
        .collect()
}

fn as_cells(row: Value, index: usize) -> DashboardResult<Vec<Value>> {
    match row {
        Value::Array(cells) => Ok(cells),
        other => Err(DashboardError::InvalidData(format!(
            "sheet row {index} must be an array, got {other}"
        ))),
    }
}
