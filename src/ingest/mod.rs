//! Spreadsheet ingestion: turn an uploaded file into rows keyed by header.

pub mod dataset;
pub mod delimited;
pub mod workbook;

use std::path::Path;

use tracing::info;

pub use dataset::{Dataset, Row};

use crate::errors::ShiplensError;

/// Upload size ceiling shared by the CLI and the HTTP API.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Delimited(Option<u8>),
    Workbook,
}

fn detect(source_name: &str) -> Result<FileKind, ShiplensError> {
    let extension = Path::new(source_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => Ok(FileKind::Delimited(None)),
        "tsv" => Ok(FileKind::Delimited(Some(b'\t'))),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(FileKind::Workbook),
        "" => Err(ShiplensError::Input(format!(
            "Cannot tell the format of '{}': no file extension",
            source_name
        ))),
        other => Err(ShiplensError::Input(format!(
            "Unsupported file type '.{}'. Use CSV, TSV, XLSX, XLS or ODS.",
            other
        ))),
    }
}

/// Parse uploaded bytes; the format is chosen by the file name's extension.
pub fn parse_bytes(source_name: &str, bytes: &[u8]) -> Result<Dataset, ShiplensError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ShiplensError::Input(format!(
            "File too large: {} bytes (limit {} bytes)",
            bytes.len(),
            MAX_UPLOAD_BYTES
        )));
    }

    let dataset = match detect(source_name)? {
        FileKind::Delimited(delimiter) => delimited::parse(source_name, bytes, delimiter)?,
        FileKind::Workbook => workbook::parse(source_name, bytes)?,
    };

    info!(
        file = %source_name,
        rows = dataset.total_rows(),
        columns = dataset.columns.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Read and parse a file from disk.
pub fn load_file(path: &Path) -> Result<Dataset, ShiplensError> {
    if !path.is_file() {
        return Err(ShiplensError::Input(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_bytes(&name, &bytes)
}
