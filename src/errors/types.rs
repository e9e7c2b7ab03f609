use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiplensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Both the primary and the fallback model failed.
    #[error("AI Service Unavailable. Primary: {primary}. Fallback: {fallback}")]
    GenerationFailed { primary: String, fallback: String },

    /// The model answered, but not with a JSON document. `raw` keeps the
    /// untouched response text for diagnosis.
    #[error("Failed to parse AI response: {message}")]
    ResponseShape { message: String, raw: String },

    #[error("Source file needed: {0}")]
    SessionRequired(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShiplensError {
    /// The single notification shown to the user when an upload or refine
    /// action fails.
    pub fn user_message(&self) -> String {
        match self {
            ShiplensError::Timeout(_) => {
                "Request timed out. The file might be too large or the AI service is busy. Please try again.".to_string()
            }
            ShiplensError::SessionRequired(_) => {
                "Source file needed: the file session was reset. Please re-select your file to continue refining.".to_string()
            }
            ShiplensError::Busy(_) => {
                "Another request is still running. Wait for it to finish and try again.".to_string()
            }
            ShiplensError::ResponseShape { .. } => "Failed to parse AI response.".to_string(),
            other => other.to_string(),
        }
    }
}
