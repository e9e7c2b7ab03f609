use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api::models::{RefineRequest, SourceSummary};
use crate::api::AppState;
use crate::errors::ShiplensError;
use crate::ingest::{self, Dataset};
use crate::models::Report;
use crate::session::Dashboard;

/// Fields of an upload form: the spreadsheet and an optional prompt.
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    custom_prompt: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ShiplensError> {
    let mut file = None;
    let mut custom_prompt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ShiplensError::Input(format!("Malformed upload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload.csv").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ShiplensError::Input(format!("Failed to read upload: {}", e)))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("customPrompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ShiplensError::Input(format!("Failed to read prompt: {}", e)))?;
                custom_prompt = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| ShiplensError::Input("No file uploaded".into()))?;
    Ok(Upload { file_name, bytes, custom_prompt })
}

async fn parse_upload(file_name: String, bytes: Vec<u8>) -> Result<Dataset, ShiplensError> {
    tokio::task::spawn_blocking(move || ingest::parse_bytes(&file_name, &bytes))
        .await
        .map_err(|e| ShiplensError::Internal(format!("Parser task failed: {}", e)))?
}

fn busy() -> ShiplensError {
    ShiplensError::Busy("a generation is already in progress".into())
}

async fn finish(state: &AppState, dashboard: &Dashboard) -> Json<Report> {
    state.publish(dashboard).await;
    Json(dashboard.report().cloned().unwrap_or_default())
}

pub async fn analyze(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Report>, ShiplensError> {
    let mut dashboard = state.dashboard.try_lock().map_err(|_| busy())?;
    let upload = read_upload(multipart).await?;
    let dataset = parse_upload(upload.file_name, upload.bytes).await?;

    info!(file = %dataset.source_name, rows = dataset.total_rows(), "API analyze request");
    let outcome = dashboard.upload(dataset, upload.custom_prompt.as_deref()).await.map(|_| ());
    // The source is kept even when generation fails, so publish either way
    let response = finish(&state, &dashboard).await;
    outcome.map(|()| response)
}

pub async fn refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<Report>, ShiplensError> {
    let mut dashboard = state.dashboard.try_lock().map_err(|_| busy())?;
    dashboard.refine(&request.prompt).await?;
    Ok(finish(&state, &dashboard).await)
}

pub async fn restore_session(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Value>, ShiplensError> {
    let mut dashboard = state.dashboard.try_lock().map_err(|_| busy())?;
    let upload = read_upload(multipart).await?;
    let dataset = parse_upload(upload.file_name, upload.bytes).await?;
    let summary = SourceSummary::from(&dataset);

    dashboard.restore_source(dataset)?;
    state.publish(&dashboard).await;
    Ok(Json(json!({"restored": true, "source": summary})))
}
