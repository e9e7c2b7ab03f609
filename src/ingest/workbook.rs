use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Number, Value};
use tracing::debug;

use super::dataset::{unique_headers, Dataset, Row};
use crate::errors::ShiplensError;

fn unreadable(source_name: &str, err: impl std::fmt::Display) -> ShiplensError {
    ShiplensError::Input(format!("Could not read workbook '{}': {}", source_name, err))
}

/// Read the first sheet of an Excel or OpenDocument workbook.
pub fn parse(source_name: &str, bytes: &[u8]) -> Result<Dataset, ShiplensError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| unreadable(source_name, e))?;

    let sheet_names = workbook.sheet_names();
    let Some(first) = sheet_names.first() else {
        return Err(ShiplensError::Input(
            "The uploaded file contains no sheets.".into(),
        ));
    };
    debug!(sheet = %first, sheets = sheet_names.len(), "Reading first sheet");

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| unreadable(source_name, e))?;

    let mut rows_iter = range.rows();
    let columns = match rows_iter.next() {
        Some(header) => unique_headers(header.iter().map(header_text)),
        None => return Ok(Dataset::new(source_name, Vec::new(), Vec::new())),
    };

    let mut rows = Vec::new();
    for cells in rows_iter {
        let mut row = Row::new();
        for (column, cell) in columns.iter().zip(cells.iter()) {
            if let Some(value) = cell_value(cell) {
                row.insert(column.clone(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(Dataset::new(source_name, columns, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Cell to JSON. Dates stay as spreadsheet serial numbers.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(n) => Some(Value::from(*n)),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::Error(e) => Some(Value::String(format!("#ERR({:?})", e))),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) => Some(Value::String(s.clone())),
        Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}
