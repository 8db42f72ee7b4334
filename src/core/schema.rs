use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::core::{Column, RawRecord, Row};
use crate::error::{DashboardError, DashboardResult};

/// Validates raw source records into typed rows.
///
/// Fails on the first missing column, unparsable cell or repeated item key;
/// a partially valid sheet never reaches the charts.
pub fn rows_from_records(records: &[RawRecord]) -> DashboardResult<Vec<Row>> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let row = row_from_record(record, index)?;
        if !seen.insert(row.item.clone()) {
            return Err(DashboardError::DuplicateItem { item: row.item });
        }
        rows.push(row);
    }
    trace!(count = rows.len(), "validated source records");
    Ok(rows)
}

/// Validates one record. `index` is only used in error messages.
pub fn row_from_record(record: &RawRecord, index: usize) -> DashboardResult<Row> {
    Ok(Row {
        item: text_cell(record, Column::Item, index)?,
        base_price: numeric_cell(record, Column::BasePrice, index)?,
        selling_price: numeric_cell(record, Column::SellingPrice, index)?,
        units_sold: numeric_cell(record, Column::UnitsSold, index)?,
        people_interested: numeric_cell(record, Column::PeopleInterested, index)?,
    })
}

fn cell(record: &RawRecord, column: Column, row: usize) -> DashboardResult<&Value> {
    record
        .get(column.name())
        .ok_or_else(|| DashboardError::MissingColumn {
            column: column.name().to_owned(),
            row,
        })
}

fn text_cell(record: &RawRecord, column: Column, row: usize) -> DashboardResult<String> {
    let text = match cell(record, column, row)? {
        Value::String(text) => text.trim().to_owned(),
        // Spreadsheets hand numeric-looking labels back as numbers.
        Value::Number(number) => number.to_string(),
        other => {
            return Err(invalid(row, column, format!("expected text, got {other}")));
        }
    };
    if text.is_empty() {
        return Err(invalid(row, column, "item label is empty".to_owned()));
    }
    Ok(text)
}

fn numeric_cell(record: &RawRecord, column: Column, row: usize) -> DashboardResult<f64> {
    let value = match cell(record, column, row)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(row, column, format!("number {number} is out of range")))?,
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<f64>()
                .map_err(|_| invalid(row, column, format!("`{trimmed}` is not a number")))?
        }
        other => {
            return Err(invalid(row, column, format!("expected number, got {other}")));
        }
    };
    if !value.is_finite() {
        return Err(invalid(row, column, "value must be finite".to_owned()));
    }
    Ok(value)
}

fn invalid(row: usize, column: Column, reason: String) -> DashboardError {
    DashboardError::InvalidCell {
        row,
        column: column.name().to_owned(),
        reason,
    }
}
