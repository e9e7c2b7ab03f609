use csv::ReaderBuilder;

use super::dataset::{infer_scalar, unique_headers, Dataset, Row};
use crate::errors::ShiplensError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse comma, semicolon or tab separated text. The first record is the
/// header row.
pub fn parse(source_name: &str, bytes: &[u8], delimiter: Option<u8>) -> Result<Dataset, ShiplensError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(bytes));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let columns = unique_headers(reader.headers().map_err(|e| unreadable(source_name, e))?.iter());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unreadable(source_name, e))?;
        let mut row = Row::new();
        for (column, field) in columns.iter().zip(record.iter()) {
            if let Some(value) = infer_scalar(field) {
                row.insert(column.clone(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(Dataset::new(source_name, columns, rows))
}

/// Decode failures (typically a non UTF-8 export) are the uploader's problem.
fn unreadable(source_name: &str, err: csv::Error) -> ShiplensError {
    let location = err
        .position()
        .map(|pos| format!(" at line {}", pos.line()))
        .unwrap_or_default();
    ShiplensError::Input(format!(
        "Could not read '{}'{}: {}. Save the file as UTF-8 CSV and try again.",
        source_name, location, err
    ))
}

/// Pick the most frequent of `,` `;` and tab on the first line.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first_line.iter().filter(|b| *b == d).count())
        .unwrap_or(b',')
}
