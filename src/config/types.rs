use serde::{Deserialize, Serialize};

/// Contents of `shiplens.yaml`. Every section and field is optional.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ShiplensConfig {
    pub llm: Option<LLMConfig>,
    pub ingest: Option<IngestConfig>,
    pub session: Option<SessionConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct LLMConfig {
    pub provider: Option<String>,
    /// Literal key, or `$NAME` to read it from the environment.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub primary_model: Option<String>,
    pub fallback_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct IngestConfig {
    /// Rows of the dataset included in the prompt.
    pub sample_rows: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct SessionConfig {
    pub timeout_secs: Option<u64>,
    pub store_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}
