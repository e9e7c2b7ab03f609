use std::path::{Path, PathBuf};
use crate::errors::ShiplensError;
use super::types::ShiplensConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "shiplens.yaml";

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<ShiplensConfig, ShiplensError> {
    if !path.exists() {
        return Err(ShiplensError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ShiplensError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<ShiplensConfig, ShiplensError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(ShiplensConfig::default());
    }

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: ShiplensConfig = serde_yaml::from_value(yaml)?;

    // Semantic conflict detection
    validate_conflicts(&config)?;

    Ok(config)
}

/// Load the explicit config file, or `./shiplens.yaml` when it exists.
pub async fn load_config(explicit: Option<&Path>) -> Result<ShiplensConfig, ShiplensError> {
    match explicit {
        Some(path) => parse_config(path).await,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                debug!(path = %default.display(), "Using config from working directory");
                parse_config(&default).await
            } else {
                Ok(ShiplensConfig::default())
            }
        }
    }
}

/// Validate config against the JSON schema for structural correctness.
/// Returns the warnings that were logged.
pub fn validate_schema(yaml: &serde_yaml::Value) -> Result<Vec<String>, ShiplensError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ShiplensError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ShiplensError::Config(format!("Schema compilation error: {}", e)))?;

    let mut messages = Vec::new();
    if let Err(errors) = compiled.validate(&json_value) {
        messages = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        // Advisory only: unknown keys and out-of-range values are reported, not rejected
        for msg in &messages {
            warn!(validation_error = %msg, "Config schema warning");
        }
    }

    Ok(messages)
}

/// Detect semantic conflicts in the parsed configuration.
pub fn validate_conflicts(config: &ShiplensConfig) -> Result<(), ShiplensError> {
    if let Some(llm) = &config.llm {
        if let (Some(primary), Some(fallback)) = (&llm.primary_model, &llm.fallback_model) {
            if primary == fallback {
                warn!(model = %primary, "Fallback model equals primary model; fallback adds no resilience");
            }
        }
        if llm.max_tokens == Some(0) {
            return Err(ShiplensError::Config("llm.max_tokens must be greater than 0".into()));
        }
    }

    if config.ingest.as_ref().and_then(|i| i.sample_rows) == Some(0) {
        return Err(ShiplensError::Config("ingest.sample_rows must be greater than 0".into()));
    }

    if config.session.as_ref().and_then(|s| s.timeout_secs) == Some(0) {
        return Err(ShiplensError::Config("session.timeout_secs must be greater than 0".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_str(
            "llm:\n  provider: openai\n  primary_model: gpt-4o\n  max_tokens: 3000\ningest:\n  sample_rows: 20\nsession:\n  timeout_secs: 90\nserver:\n  port: 9000\n",
        )
        .unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.provider.as_deref(), Some("openai"));
        assert_eq!(llm.max_tokens, Some(3000));
        assert_eq!(config.ingest.unwrap().sample_rows, Some(20));
        assert_eq!(config.session.unwrap().timeout_secs, Some(90));
        assert_eq!(config.server.unwrap().port, Some(9000));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config_str("").unwrap(), ShiplensConfig::default());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = parse_config_str("session:\n  timeout_secs: 0\n").unwrap_err();
        assert!(matches!(err, ShiplensError::Config(_)));
    }

    #[test]
    fn test_zero_sample_rows_is_rejected() {
        assert!(parse_config_str("ingest:\n  sample_rows: 0\n").is_err());
    }

    #[test]
    fn test_same_fallback_is_only_a_warning() {
        let config = parse_config_str("llm:\n  primary_model: m\n  fallback_model: m\n");
        assert!(config.is_ok());
    }

    #[test]
    fn test_schema_warnings_are_advisory() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("llm:\n  provider: acme\n").unwrap();
        let warnings = validate_schema(&yaml).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/shiplens.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
