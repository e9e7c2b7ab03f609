#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shiplens::errors::ShiplensError;
use shiplens::generation::{GenerationClient, GenerationOptions};
use shiplens::llm::{CompletionRequest, LLMProvider, LLMResponse};

pub const SHIPMENTS_CSV: &str = "Carrier,Cost,Ship Date\nUPS,\"$1,200\",2024-01-02\nFedEx,800,2024-01-03\nDHL,450,2024-01-04\n";

pub const INITIAL_REPORT: &str = r#"```json
{
  "analysisTitle": "Carrier Performance",
  "analysisDescription": "Three carriers over one week",
  "keyMetrics": [{"label": "Total Shipments", "value": 3, "description": "All rows", "icon": "Users", "variant": "default"}],
  "dynamicCharts": [{"id": "cost", "title": "Cost by Carrier", "description": "Spend", "chartType": "Bar", "data": [{"name": "UPS", "value": "$1,200"}, {"name": "FedEx", "value": 800}]}],
  "keyInsights": [{"title": "UPS leads spend", "severity": "positive", "description": "UPS is the largest line"}],
  "recommendations": [{"title": "Rebid lanes", "action": "Run a Q2 tender", "impact": "high"}]
}
```"#;

pub const REFINEMENT: &str = r#"{
  "keyInsights": [{"title": "Late Mondays", "severity": "warning", "description": "Monday pickups slip"}, {"title": "UPS leads spend", "severity": "info", "description": "duplicate"}],
  "recommendations": [{"title": "Rebid lanes", "action": "Tender only the DHL lanes", "impact": "medium"}],
  "removals": [{"type": "recommendation", "title": "Rebid lanes"}]
}"#;

/// Provider that answers from a queue and records every prompt it receives.
pub struct QueueProvider {
    model: &'static str,
    answers: Mutex<VecDeque<Result<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LLMProvider for QueueProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<LLMResponse, ShiplensError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(LLMResponse {
                content,
                input_tokens: Some(100),
                output_tokens: Some(50),
                model: self.model.to_string(),
            }),
            Some(Err(message)) => Err(ShiplensError::RateLimit(message)),
            None => Err(ShiplensError::LLMApi(format!("{} has no scripted answer", self.model))),
        }
    }

    fn provider_name(&self) -> &str {
        "queue"
    }

    fn model_name(&self) -> &str {
        self.model
    }
}

pub struct Script {
    pub primary: Vec<Result<String, String>>,
    pub fallback: Vec<Result<String, String>>,
}

impl Script {
    pub fn answers(answers: &[&str]) -> Self {
        Self {
            primary: answers.iter().map(|a| Ok(a.to_string())).collect(),
            fallback: Vec::new(),
        }
    }
}

/// Build a generation client from scripted answers. Returns the client and
/// the prompts sent to the primary model.
pub fn scripted_client(script: Script) -> (GenerationClient, Arc<Mutex<Vec<String>>>) {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let primary = QueueProvider {
        model: "primary-model",
        answers: Mutex::new(script.primary.into()),
        prompts: prompts.clone(),
    };
    let fallback = QueueProvider {
        model: "fallback-model",
        answers: Mutex::new(script.fallback.into()),
        prompts: Arc::new(Mutex::new(Vec::new())),
    };
    let client = GenerationClient::new(Box::new(primary), Box::new(fallback), GenerationOptions::default());
    (client, prompts)
}
