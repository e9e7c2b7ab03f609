use std::time::Instant;

use tracing::{debug, info, warn};

use super::parse::extract_json;
use crate::config::LlmSettings;
use crate::errors::ShiplensError;
use crate::llm::{create_provider, CompletionRequest, LLMProvider, LLMResponse};
use crate::models::Report;
use crate::utils::formatting::format_duration;
use crate::utils::truncation::preview;

/// Sampling parameters shared by both model tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: CompletionRequest::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Turns a prompt into a report using a primary model and, when the primary
/// fails with a recoverable error, a single fallback attempt.
pub struct GenerationClient {
    primary: Box<dyn LLMProvider>,
    fallback: Box<dyn LLMProvider>,
    options: GenerationOptions,
}

impl GenerationClient {
    pub fn new(primary: Box<dyn LLMProvider>, fallback: Box<dyn LLMProvider>, options: GenerationOptions) -> Self {
        Self { primary, fallback, options }
    }

    /// Build both tiers from resolved settings. A missing API key is a
    /// configuration error.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ShiplensError> {
        let key = settings.api_key.as_deref();
        let base_url = settings.base_url.as_deref();
        let primary = create_provider(&settings.provider, key, &settings.primary_model, base_url)?;
        let fallback = create_provider(&settings.provider, key, &settings.fallback_model, base_url)?;
        info!(
            provider = %settings.provider,
            primary = %settings.primary_model,
            fallback = %settings.fallback_model,
            "Generation client ready"
        );
        Ok(Self::new(
            primary,
            fallback,
            GenerationOptions {
                temperature: settings.temperature,
                max_tokens: settings.max_tokens,
            },
        ))
    }

    pub fn primary_model(&self) -> &str {
        self.primary.model_name()
    }

    pub fn fallback_model(&self) -> &str {
        self.fallback.model_name()
    }

    /// Generate a report for `prompt`. `record_count` is the dataset's full
    /// row count and is stamped onto the result.
    pub async fn generate(&self, prompt: &str, record_count: usize) -> Result<Report, ShiplensError> {
        let request = CompletionRequest::new(prompt)
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens);

        let response = self.complete_with_fallback(&request).await?;

        let payload = extract_json(&response.content).inspect_err(|_| {
            warn!(model = %response.model, raw = %preview(&response.content), "Model response is not JSON");
        })?;
        let mut report = Report::from_payload(payload)?;
        report.record_count = Some(record_count);

        info!(
            model = %response.model,
            metrics = report.key_metrics.len(),
            charts = report.dynamic_charts.len(),
            insights = report.key_insights.len(),
            recommendations = report.recommendations.len(),
            removals = report.removals.len(),
            "Report generated"
        );
        Ok(report)
    }

    async fn complete_with_fallback(&self, request: &CompletionRequest) -> Result<LLMResponse, ShiplensError> {
        let started = Instant::now();
        let primary_err = match self.primary.complete(request).await {
            Ok(response) => {
                debug!(
                    model = %self.primary.model_name(),
                    elapsed = %format_duration(started.elapsed().as_millis() as u64),
                    "Primary model answered"
                );
                return Ok(response);
            }
            Err(e) => e,
        };

        let class = primary_err.classify();
        if !class.fallback_eligible {
            return Err(primary_err);
        }

        warn!(
            primary = %self.primary.model_name(),
            fallback = %self.fallback.model_name(),
            error_type = class.error_type,
            error = %primary_err,
            "Primary model failed, attempting fallback"
        );

        self.fallback.complete(request).await.map_err(|fallback_err| {
            ShiplensError::GenerationFailed {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Script {
        Answer(&'static str),
        Fail(fn() -> ShiplensError),
    }

    struct ScriptedProvider {
        model: &'static str,
        script: Script,
        calls: Arc<AtomicUsize>,
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<LLMResponse, ShiplensError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(self.model);
            match &self.script {
                Script::Answer(text) => Ok(LLMResponse {
                    content: text.to_string(),
                    input_tokens: None,
                    output_tokens: None,
                    model: self.model.to_string(),
                }),
                Script::Fail(make) => Err(make()),
            }
        }

        fn provider_name(&self) -> &str { "scripted" }
        fn model_name(&self) -> &str { self.model }
    }

    struct Harness {
        client: GenerationClient,
        primary_calls: Arc<AtomicUsize>,
        fallback_calls: Arc<AtomicUsize>,
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    fn harness(primary: Script, fallback: Script) -> Harness {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let client = GenerationClient::new(
            Box::new(ScriptedProvider { model: "big", script: primary, calls: primary_calls.clone(), log: log.clone() }),
            Box::new(ScriptedProvider { model: "small", script: fallback, calls: fallback_calls.clone(), log: log.clone() }),
            GenerationOptions::default(),
        );
        Harness { client, primary_calls, fallback_calls, log }
    }

    const REPORT: &str = r#"```json
{"analysisTitle": "Carrier Review", "keyMetrics": [{"label": "Shipments", "value": 40}]}
```"#;

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let h = harness(Script::Answer(REPORT), Script::Answer("{}"));
        let report = h.client.generate("p", 40).await.unwrap();
        assert_eq!(report.analysis_title, "Carrier Review");
        assert_eq!(report.key_metrics[0].value, "40");
        assert_eq!(report.record_count, Some(40));
        assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_runs_after_primary_failure() {
        let h = harness(
            Script::Fail(|| ShiplensError::RateLimit("tokens per minute".into())),
            Script::Answer(REPORT),
        );
        let report = h.client.generate("p", 12).await.unwrap();
        assert_eq!(report.record_count, Some(12));
        assert_eq!(*h.log.lock().unwrap(), vec!["big", "small"]);
    }

    #[tokio::test]
    async fn test_both_failures_are_reported() {
        let h = harness(
            Script::Fail(|| ShiplensError::RateLimit("primary quota".into())),
            Script::Fail(|| ShiplensError::Network("fallback reset".into())),
        );
        let err = h.client.generate("p", 1).await.unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ShiplensError::GenerationFailed { .. }));
        assert!(msg.contains("primary quota"));
        assert!(msg.contains("fallback reset"));
        assert_eq!(h.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_config_error_skips_fallback() {
        let h = harness(
            Script::Fail(|| ShiplensError::Config("GROQ_API_KEY is not set.".into())),
            Script::Answer(REPORT),
        );
        let err = h.client.generate("p", 1).await.unwrap_err();
        assert!(matches!(err, ShiplensError::Config(_)));
        assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_json_answer_is_response_shape_error() {
        let h = harness(Script::Answer("Sorry, I cannot help."), Script::Answer(REPORT));
        let err = h.client.generate("p", 1).await.unwrap_err();
        match err {
            ShiplensError::ResponseShape { raw, .. } => assert_eq!(raw, "Sorry, I cannot help."),
            other => panic!("unexpected: {}", other),
        }
        assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_top_level_array_is_rejected() {
        let h = harness(Script::Answer("[1, 2]"), Script::Answer(REPORT));
        let err = h.client.generate("p", 1).await.unwrap_err();
        assert!(matches!(err, ShiplensError::ResponseShape { .. }));
    }
}
