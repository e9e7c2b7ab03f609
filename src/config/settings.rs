use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ShiplensError;
use crate::llm::catalog::{self, DEFAULT_PROVIDER};
use crate::prompts::DEFAULT_SAMPLE_ROWS;
use super::credentials::resolve_credential;
use super::types::ShiplensConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STORE_PATH: &str = "./data/shiplens.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<String>,
    pub primary_model: Option<String>,
    pub fallback_model: Option<String>,
    pub store_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: String,
    /// Key from the config file. `None` means the provider's environment
    /// variable is consulted when the client is built.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub llm: LlmSettings,
    pub sample_rows: usize,
    pub timeout: Duration,
    pub store_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Merge command-line overrides, the config file and catalog defaults,
    /// in that order of precedence.
    pub fn resolve(config: &ShiplensConfig, overrides: &Overrides) -> Result<Self, ShiplensError> {
        let llm = config.llm.clone().unwrap_or_default();
        let ingest = config.ingest.clone().unwrap_or_default();
        let session = config.session.clone().unwrap_or_default();
        let server = config.server.clone().unwrap_or_default();

        let provider = overrides
            .provider
            .clone()
            .or(llm.provider)
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
            .to_lowercase();
        let info = catalog::get_provider(&provider).ok_or_else(|| {
            ShiplensError::Config(format!(
                "Unknown LLM provider: {} (expected one of: {})",
                provider,
                catalog::provider_ids().join(", ")
            ))
        })?;

        let timeout_secs = overrides
            .timeout_secs
            .or(session.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ShiplensError::Config("Timeout must be greater than 0 seconds".into()));
        }

        Ok(Self {
            llm: LlmSettings {
                provider: info.id.to_string(),
                api_key: llm.api_key.as_deref().and_then(resolve_credential),
                base_url: llm.base_url.filter(|u| !u.trim().is_empty()),
                primary_model: overrides
                    .primary_model
                    .clone()
                    .or(llm.primary_model)
                    .unwrap_or_else(|| info.primary_model.to_string()),
                fallback_model: overrides
                    .fallback_model
                    .clone()
                    .or(llm.fallback_model)
                    .unwrap_or_else(|| info.fallback_model.to_string()),
                max_tokens: llm.max_tokens.unwrap_or(crate::llm::CompletionRequest::DEFAULT_MAX_TOKENS),
                temperature: llm.temperature.unwrap_or(0.0),
            },
            sample_rows: ingest.sample_rows.unwrap_or(DEFAULT_SAMPLE_ROWS).max(1),
            timeout: Duration::from_secs(timeout_secs),
            store_path: overrides
                .store_path
                .clone()
                .or(session.store_path.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            host: overrides
                .host
                .clone()
                .or(server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(server.port).unwrap_or(DEFAULT_PORT),
        })
    }
}
