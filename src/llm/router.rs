use crate::errors::ShiplensError;
use super::provider::LLMProvider;
use super::openai::OpenAICompatibleProvider;
use super::gemini::GeminiProvider;
use super::catalog::{self, Backend, ProviderInfo};

/// Explicit key if given and non-blank, else the provider's environment variable.
pub fn resolve_api_key(info: &ProviderInfo, explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| {
            if info.env_var.is_empty() {
                None
            } else {
                std::env::var(info.env_var).ok().filter(|k| !k.trim().is_empty())
            }
        })
}

pub fn create_provider(
    provider_name: &str,
    api_key: Option<&str>,
    model: &str,
    base_url: Option<&str>,
) -> Result<Box<dyn LLMProvider>, ShiplensError> {
    let info = catalog::get_provider(provider_name).ok_or_else(|| {
        ShiplensError::Config(format!(
            "Unknown LLM provider: {} (expected one of: {})",
            provider_name,
            catalog::provider_ids().join(", ")
        ))
    })?;

    let key = match resolve_api_key(info, api_key) {
        Some(key) => key,
        None if info.requires_key() => {
            return Err(ShiplensError::Config(format!("{} is not set.", info.env_var)));
        }
        None => String::new(),
    };
    let url = base_url.unwrap_or(info.base_url);

    match info.backend {
        Backend::ChatCompletions => Ok(Box::new(OpenAICompatibleProvider::new(info.id, &key, model, url))),
        Backend::Gemini => Ok(Box::new(GeminiProvider::new(&key, model, url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = create_provider("acme", Some("k"), "m", None).err().unwrap();
        assert!(matches!(err, ShiplensError::Config(_)));
    }

    #[test]
    fn test_explicit_key_builds_provider() {
        let provider = create_provider("groq", Some("gsk_test"), "llama-3.1-8b-instant", None).unwrap();
        assert_eq!(provider.provider_name(), "groq");
        assert_eq!(provider.model_name(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_local_without_key() {
        let provider = create_provider("local", None, "qwen2.5:7b", None).unwrap();
        assert_eq!(provider.provider_name(), "local");
    }

    #[test]
    fn test_blank_explicit_key_is_ignored() {
        let info = catalog::get_provider("local").unwrap();
        assert_eq!(resolve_api_key(info, Some("   ")), None);
    }
}
