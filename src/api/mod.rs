pub mod auth;
pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ingest::MAX_UPLOAD_BYTES;
use crate::models::Report;
use crate::session::Dashboard;
use self::models::SourceSummary;

/// Read-only copy of the dashboard state, served while a generation holds the lock.
#[derive(Debug, Clone, Default)]
pub struct Published {
    pub report: Option<Report>,
    pub source: Option<SourceSummary>,
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub published: Arc<RwLock<Published>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let published = Published {
            report: dashboard.report().cloned(),
            source: dashboard.source().map(SourceSummary::from),
        };
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            published: Arc::new(RwLock::new(published)),
        }
    }

    /// Copy the dashboard's current state into the published view.
    pub async fn publish(&self, dashboard: &Dashboard) {
        let mut published = self.published.write().await;
        published.report = dashboard.report().cloned();
        published.source = dashboard.source().map(SourceSummary::from);
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/report",
            get(routes::report::get_report).delete(routes::report::reset_report),
        )
        .route("/api/report/export", get(routes::report::export_report))
        .route("/api/analyze", post(routes::analyze::analyze))
        .route("/api/refine", post(routes::analyze::refine))
        .route("/api/session/restore", post(routes::analyze::restore_session))
        .route_layer(middleware::from_fn(auth::api_auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
