use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::errors::ShiplensError;
use super::provider::{check_status, LLMProvider};
use super::types::{CompletionRequest, LLMResponse};

/// Any backend speaking the OpenAI chat completions protocol: Groq, OpenAI,
/// OpenRouter and local Ollama-style servers.
pub struct OpenAICompatibleProvider {
    client: Client,
    provider: String,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAICompatibleProvider {
    pub fn new(provider: &str, api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            provider: provider.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(sys) = &request.system {
            messages.push(json!({"role": "system", "content": sys}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<LLMResponse, ShiplensError> {
        let mut http = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&self.request_body(request));
        if !self.api_key.is_empty() {
            http = http.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = http
            .send()
            .await
            .map_err(|e| ShiplensError::Network(format!("{} request failed: {}", self.provider, e)))?;
        let resp = check_status(&self.provider, resp).await?;

        let data: Value = resp.json().await
            .map_err(|e| ShiplensError::LLMApi(format!("Failed to parse {} response: {}", self.provider, e)))?;

        if let Some(error) = data.get("error") {
            return Err(ShiplensError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ShiplensError::LLMApi(format!("No content in {} response", self.provider)))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        debug!(
            provider = %self.provider,
            model = %self.model,
            input_tokens = ?input_tokens,
            output_tokens = ?output_tokens,
            "Chat completion finished"
        );

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { &self.provider }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_json_mode() {
        let provider = OpenAICompatibleProvider::new("groq", "k", "llama-3.3-70b-versatile", "https://api.groq.com/openai/v1/");
        let body = provider.request_body(&CompletionRequest::new("hello").with_max_tokens(123));
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 123);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(provider.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_request_body_with_system() {
        let provider = OpenAICompatibleProvider::new("local", "", "qwen2.5:7b", "http://localhost:11434/v1");
        let mut request = CompletionRequest::new("hi").with_system("be terse");
        request.json_mode = false;
        let body = provider.request_body(&request);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body.get("response_format").is_none());
    }
}
