use tracing::debug;

use crate::cli::commands::GlobalArgs;
use crate::config::{self, Overrides, Settings};
use crate::db::Database;
use crate::errors::ShiplensError;
use crate::generation::GenerationClient;
use crate::session::{Dashboard, DashboardOptions};

/// Load the config file and fold in command-line overrides.
pub async fn resolve_settings(global: &GlobalArgs, overrides: Overrides) -> Result<Settings, ShiplensError> {
    let file_config = config::load_config(global.config.as_deref()).await?;
    let overrides = Overrides {
        provider: global.provider.clone(),
        primary_model: global.model.clone(),
        fallback_model: global.fallback_model.clone(),
        store_path: global.store.clone(),
        timeout_secs: global.timeout,
        ..overrides
    };
    let settings = Settings::resolve(&file_config, &overrides)?;
    debug!(
        provider = %settings.llm.provider,
        store = %settings.store_path.display(),
        timeout_secs = settings.timeout.as_secs(),
        "Settings resolved"
    );
    Ok(settings)
}

pub fn open_store(settings: &Settings) -> Result<Database, ShiplensError> {
    Database::new(&settings.store_path)
}

/// Build the generation client and open the dashboard over the snapshot store.
pub fn open_dashboard(settings: &Settings) -> Result<Dashboard, ShiplensError> {
    let generator = GenerationClient::from_settings(&settings.llm)?;
    let store = open_store(settings)?;
    Ok(Dashboard::open(
        generator,
        store,
        DashboardOptions {
            sample_rows: settings.sample_rows,
            timeout: settings.timeout,
        },
    ))
}
