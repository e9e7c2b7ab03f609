use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::api::models::ExportQuery;
use crate::api::AppState;
use crate::errors::ShiplensError;
use crate::models::Report;
use crate::reporting::{default_file_name, render, ExportFormat};

pub async fn get_report(State(state): State<AppState>) -> Result<Json<Report>, (StatusCode, Json<Value>)> {
    match state.published.read().await.report.clone() {
        Some(report) => Ok(Json(report)),
        None => Err((StatusCode::NOT_FOUND, Json(json!({"error": "No report yet"})))),
    }
}

pub async fn reset_report(State(state): State<AppState>) -> Result<Json<Value>, ShiplensError> {
    let mut dashboard = state
        .dashboard
        .try_lock()
        .map_err(|_| ShiplensError::Busy("a generation is in progress".into()))?;
    dashboard.reset()?;
    state.publish(&dashboard).await;
    Ok(Json(json!({"status": "cleared"})))
}

pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ShiplensError> {
    let format = match query.format.as_deref() {
        Some(name) => ExportFormat::from_str(name)?,
        None => ExportFormat::default(),
    };
    let report = state
        .published
        .read()
        .await
        .report
        .clone()
        .ok_or_else(|| ShiplensError::Input("No report to export yet".into()))?;

    let disposition = format!("attachment; filename=\"{}\"", default_file_name(format));
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render(&report, format),
    )
        .into_response())
}
