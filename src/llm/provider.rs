use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use crate::errors::ShiplensError;
use crate::utils::truncation::truncate_error;
use super::types::{CompletionRequest, LLMResponse};

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Run one completion and return the raw text answer
    async fn complete(&self, request: &CompletionRequest) -> Result<LLMResponse, ShiplensError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}

/// Map a non-success HTTP status to the matching error kind.
pub(crate) async fn check_status(provider: &str, resp: Response) -> Result<Response, ShiplensError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(provider, status, &body))
}

pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> ShiplensError {
    match status.as_u16() {
        429 => ShiplensError::RateLimit(format!("{} rate limit: {}", provider, truncate_error(body))),
        401 | 403 => ShiplensError::Authentication(format!("{} rejected the API key ({})", provider, status)),
        _ => ShiplensError::LLMApi(format!("{} returned {}: {}", provider, status, truncate_error(body))),
    }
}
