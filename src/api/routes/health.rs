use axum::{extract::State, Json};

use crate::api::models::HealthResponse;
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let published = state.published.read().await;
    Json(HealthResponse {
        status: "healthy",
        service: "shiplens",
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_HASH").unwrap_or("dev"),
        built: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        has_report: published.report.is_some(),
        source: published.source.clone(),
        busy: state.dashboard.try_lock().is_err(),
    })
}
