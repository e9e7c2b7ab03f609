use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::config::credentials::redact_credentials;
use crate::errors::ShiplensError;
use super::provider::{check_status, LLMProvider};
use super::types::{CompletionRequest, LLMResponse};

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut generation_config = json!({
            "temperature": request.temperature,
            "maxOutputTokens": request.max_tokens,
        });
        if request.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let mut body = json!({
            "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
            "generationConfig": generation_config,
        });
        if let Some(sys) = &request.system {
            body["systemInstruction"] = json!({"parts": [{"text": sys}]});
        }
        body
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<LLMResponse, ShiplensError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let resp = self.client.post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| {
                let message = format!("Gemini request failed: {}", e);
                ShiplensError::Network(redact_credentials(&message, &[self.api_key.as_str()]))
            })?;
        let resp = check_status("gemini", resp).await?;

        let data: Value = resp.json().await
            .map_err(|e| ShiplensError::LLMApi(format!("Parse error: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(ShiplensError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content: String = data["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();
        if content.trim().is_empty() {
            let reason = data["candidates"][0]["finishReason"].as_str().unwrap_or("no candidates");
            return Err(ShiplensError::LLMApi(format!("Empty Gemini response ({})", reason)));
        }

        let input_tokens = data["usageMetadata"]["promptTokenCount"].as_u64();
        let output_tokens = data["usageMetadata"]["candidatesTokenCount"].as_u64();
        debug!(model = %self.model, input_tokens = ?input_tokens, output_tokens = ?output_tokens, "Gemini completion finished");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "gemini" }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let provider = GeminiProvider::new("k", "gemini-2.5-flash", "https://generativelanguage.googleapis.com/v1beta");
        let body = provider.request_body(&CompletionRequest::new("analyze").with_system("sys"));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4000);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyze");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
    }
}
