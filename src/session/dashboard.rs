use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::db::Database;
use crate::errors::ShiplensError;
use crate::generation::GenerationClient;
use crate::ingest::Dataset;
use crate::merge::merge;
use crate::models::Report;
use crate::prompts::{build_analysis_prompt, build_refinement_request, DEFAULT_SAMPLE_ROWS};
use crate::reporting::{render, ExportFormat};
use crate::utils::formatting::format_duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardOptions {
    pub sample_rows: usize,
    /// Wall-clock limit for one generation, fallback included.
    pub timeout: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Owner of the live report and the dataset it was generated from.
///
/// Every mutation goes through here. A new report replaces the old one only
/// after generation, merge and persistence all succeeded; any failure leaves
/// both the in-memory report and the stored snapshot as they were.
pub struct Dashboard {
    generator: GenerationClient,
    store: Database,
    options: DashboardOptions,
    report: Option<Report>,
    source: Option<Dataset>,
}

impl Dashboard {
    /// Open the dashboard and load the persisted report. A snapshot that
    /// cannot be read is logged and ignored.
    pub fn open(generator: GenerationClient, store: Database, options: DashboardOptions) -> Self {
        let report = match store.load_report() {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable dashboard snapshot");
                None
            }
        };
        if let Some(report) = &report {
            info!(title = %report.analysis_title, items = report.item_count(), "Restored dashboard snapshot");
        }
        Self { generator, store, options, report, source: None }
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn source(&self) -> Option<&Dataset> {
        self.source.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn generator(&self) -> &GenerationClient {
        &self.generator
    }

    /// Analyze a freshly uploaded dataset. The previous report is replaced
    /// wholesale on success.
    pub async fn upload(&mut self, dataset: Dataset, prompt: Option<&str>) -> Result<&Report, ShiplensError> {
        if dataset.is_empty() {
            return Err(ShiplensError::Input(format!(
                "'{}' contains no data rows",
                dataset.source_name
            )));
        }

        info!(file = %dataset.source_name, rows = dataset.total_rows(), "Analyzing upload");
        let source = self.source.insert(dataset);
        let prompt_text = build_analysis_prompt(source, prompt, self.options.sample_rows);
        let record_count = source.total_rows();

        let incoming = self.generate(&prompt_text, record_count).await?;
        let merged = merge(None, incoming);
        self.commit(merged)
    }

    /// Ask for additions, removals or replacements on top of the current report.
    pub async fn refine(&mut self, prompt: &str) -> Result<&Report, ShiplensError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ShiplensError::Input("Refinement prompt is empty".into()));
        }
        let source = self.source.as_ref().ok_or_else(|| {
            ShiplensError::SessionRequired(
                "no source file in this session; load or restore the file before refining".into(),
            )
        })?;

        info!(prompt = %prompt, "Refining report");
        let request = build_refinement_request(prompt, self.report.as_ref());
        let prompt_text = build_analysis_prompt(source, Some(&request), self.options.sample_rows);
        let record_count = source.total_rows();

        let incoming = self.generate(&prompt_text, record_count).await?;
        let merged = merge(self.report.as_ref(), incoming);
        self.commit(merged)
    }

    /// Re-attach the source dataset, e.g. after a restart, without regenerating.
    pub fn restore_source(&mut self, dataset: Dataset) -> Result<(), ShiplensError> {
        if dataset.is_empty() {
            return Err(ShiplensError::Input(format!(
                "'{}' contains no data rows",
                dataset.source_name
            )));
        }
        info!(file = %dataset.source_name, rows = dataset.total_rows(), "Source file restored");
        self.source = Some(dataset);
        Ok(())
    }

    /// Forget the report, the source and the stored snapshot.
    pub fn reset(&mut self) -> Result<(), ShiplensError> {
        self.store.clear_report()?;
        self.report = None;
        self.source = None;
        info!("Dashboard reset");
        Ok(())
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, ShiplensError> {
        let report = self
            .report
            .as_ref()
            .ok_or_else(|| ShiplensError::Input("No report to export yet".into()))?;
        Ok(render(report, format))
    }

    async fn generate(&self, prompt: &str, record_count: usize) -> Result<Report, ShiplensError> {
        let started = Instant::now();
        let limit = self.options.timeout;
        match tokio::time::timeout(limit, self.generator.generate(prompt, record_count)).await {
            Ok(result) => {
                if result.is_ok() {
                    info!(elapsed = %format_duration(started.elapsed().as_millis() as u64), "Generation finished");
                }
                result
            }
            Err(_) => {
                warn!(limit = %format_duration(limit.as_millis() as u64), "Generation timed out");
                Err(ShiplensError::Timeout(format!(
                    "no response within {}",
                    format_duration(limit.as_millis() as u64)
                )))
            }
        }
    }

    fn commit(&mut self, report: Report) -> Result<&Report, ShiplensError> {
        self.store.save_report(&report)?;
        Ok(self.report.insert(report))
    }
}
