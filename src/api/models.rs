use serde::{Deserialize, Serialize};

use crate::ingest::Dataset;

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// The active source file, without its rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub source_name: String,
    pub total_rows: usize,
    pub columns: Vec<String>,
}

impl From<&Dataset> for SourceSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            source_name: dataset.source_name.clone(),
            total_rows: dataset.total_rows(),
            columns: dataset.columns.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub commit: &'static str,
    pub built: &'static str,
    pub has_report: bool,
    pub source: Option<SourceSummary>,
    pub busy: bool,
}
