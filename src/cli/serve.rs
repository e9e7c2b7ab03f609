use tracing::info;

use crate::api;
use crate::cli::commands::{GlobalArgs, ServeArgs};
use crate::cli::context::{open_dashboard, resolve_settings};
use crate::config::Overrides;
use crate::errors::ShiplensError;

pub async fn handle_serve(global: &GlobalArgs, args: ServeArgs) -> Result<(), ShiplensError> {
    let settings = resolve_settings(
        global,
        Overrides {
            host: args.host,
            port: args.port,
            ..Default::default()
        },
    )
    .await?;
    info!(host = %settings.host, port = settings.port, "Starting API server");

    let dashboard = open_dashboard(&settings)?;
    let state = api::AppState::new(dashboard);
    let app = api::build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ShiplensError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
