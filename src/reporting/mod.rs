pub mod formatter;
pub mod html;

use std::path::Path;
use std::str::FromStr;

use crate::errors::ShiplensError;
use crate::models::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ShiplensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(ShiplensError::Input(format!(
                "Unknown export format '{}' (use markdown or html)",
                other
            ))),
        }
    }
}

pub fn render(report: &Report, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => formatter::format_report_markdown(report),
        ExportFormat::Html => html::format_report_html(report),
    }
}

/// File name used when an export is saved without an explicit path.
pub fn default_file_name(format: ExportFormat) -> String {
    format!("shiplens-report.{}", format.extension())
}

/// Write an export to disk, creating parent directories as needed.
pub fn write_export(path: &Path, content: &str) -> Result<(), ShiplensError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
