//! Flat CSV output.
//!
//! The header is the key set of the first record, in field order. Required
//! scalar fields are written as plain text. Lists, mappings and present
//! optional values are written as compact JSON text inside their cell, so an
//! optional empty string (`""`) stays distinct from `null` (an empty cell).

use std::path::Path;

use cinedata_movie_models::MovieRecord;
use serde_json::{Map, Value};

use crate::{DatasetError, ensure_parent};

/// Flattens a record to its serialized key/value pairs, in field order.
fn record_object(record: &MovieRecord) -> Result<Map<String, Value>, DatasetError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(DatasetError::Cell {
            row: 0,
            column: String::new(),
            message: format!("record serialized to non-object {other}"),
        }),
    }
}

fn cell_text(column: &str, value: Option<&Value>) -> Result<String, DatasetError> {
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(text @ Value::String(_)) if MovieRecord::OPTIONAL_FIELDS.contains(&column) => {
            serde_json::to_string(text)?
        }
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => serde_json::to_string(nested)?,
    })
}

/// Writes `records` as CSV, creating parent directories.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be created or written.
pub fn write_csv(records: &[MovieRecord], path: &Path) -> Result<(), DatasetError> {
    let Some(first) = records.first() else {
        log::warn!("No records for {}; nothing written", path.display());
        return Ok(());
    };

    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    let header: Vec<String> = record_object(first)?.keys().cloned().collect();
    writer.write_record(&header)?;

    for record in records {
        let object = record_object(record)?;
        let row = header
            .iter()
            .map(|column| cell_text(column, object.get(column)))
            .collect::<Result<Vec<_>, _>>()?;
        writer.write_record(&row)?;
    }

    writer.flush().map_err(|e| DatasetError::io(path, e))
}

/// Turns one cell back into the JSON value its column holds.
fn cell_value(column: &str, cell: &str) -> Result<Value, String> {
    if MovieRecord::STRUCTURED_FIELDS.contains(&column)
        || MovieRecord::NUMERIC_FIELDS.contains(&column)
    {
        return serde_json::from_str(cell).map_err(|e| e.to_string());
    }
    if MovieRecord::OPTIONAL_FIELDS.contains(&column) {
        if cell.is_empty() {
            return Ok(Value::Null);
        }
        return match serde_json::from_str::<Value>(cell).map_err(|e| e.to_string())? {
            text @ Value::String(_) => Ok(text),
            other => Err(format!("expected a quoted string, found {other}")),
        };
    }
    Ok(Value::String(cell.to_owned()))
}

/// Loads records written by [`write_csv`].
///
/// An empty optional cell loads as `None`; a quoted one as `Some`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read, a row has the wrong
/// number of cells, or a cell does not decode for its column.
pub fn read_csv(path: &Path) -> Result<Vec<MovieRecord>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let mut object = Map::new();
        for (column, cell) in header.iter().zip(row.iter()) {
            let value = cell_value(column, cell).map_err(|message| DatasetError::Cell {
                row: index + 1,
                column: column.to_owned(),
                message,
            })?;
            object.insert(column.to_owned(), value);
        }

        let record = serde_json::from_value(Value::Object(object)).map_err(|e| {
            DatasetError::Cell {
                row: index + 1,
                column: String::new(),
                message: e.to_string(),
            }
        })?;
        records.push(record);
    }

    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
