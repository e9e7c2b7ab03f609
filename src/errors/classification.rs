use super::types::ShiplensError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Whether a failed primary-model attempt may be retried once on the
    /// fallback model.
    pub fallback_eligible: bool,
}

impl ShiplensError {
    /// Classify this error to determine its type and whether the fallback
    /// model should be tried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Provider failures: the fallback tier gets one attempt
            ShiplensError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                fallback_eligible: true,
            },
            ShiplensError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                fallback_eligible: true,
            },
            ShiplensError::LLMApi(_) => ErrorClassification {
                error_type: "LLMApiError",
                fallback_eligible: true,
            },
            ShiplensError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                fallback_eligible: true,
            },
            ShiplensError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                fallback_eligible: true,
            },

            // Fatal for the current request
            ShiplensError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                fallback_eligible: false,
            },
            ShiplensError::Input(_) => ErrorClassification {
                error_type: "InputError",
                fallback_eligible: false,
            },
            ShiplensError::GenerationFailed { .. } => ErrorClassification {
                error_type: "GenerationError",
                fallback_eligible: false,
            },
            ShiplensError::ResponseShape { .. } => ErrorClassification {
                error_type: "ResponseShapeError",
                fallback_eligible: false,
            },
            ShiplensError::SessionRequired(_) => ErrorClassification {
                error_type: "SessionRequiredError",
                fallback_eligible: false,
            },
            ShiplensError::Busy(_) => ErrorClassification {
                error_type: "BusyError",
                fallback_eligible: false,
            },

            // Default: eligible
            ShiplensError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fallback_eligible: true,
            },
            ShiplensError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fallback_eligible: true,
            },
            ShiplensError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                fallback_eligible: true,
            },
            ShiplensError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                fallback_eligible: true,
            },
            ShiplensError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                fallback_eligible: true,
            },
        }
    }
}
