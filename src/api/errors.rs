use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::ShiplensError;

impl ShiplensError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShiplensError::Input(_) => StatusCode::BAD_REQUEST,
            ShiplensError::SessionRequired(_) | ShiplensError::Busy(_) => StatusCode::CONFLICT,
            ShiplensError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ShiplensError::GenerationFailed { .. }
            | ShiplensError::ResponseShape { .. }
            | ShiplensError::Network(_)
            | ShiplensError::RateLimit(_)
            | ShiplensError::Authentication(_)
            | ShiplensError::LLMApi(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShiplensError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let mut body = json!({
            "error": self.user_message(),
            "type": self.classify().error_type,
        });
        match &self {
            ShiplensError::ResponseShape { message, raw } => {
                body["details"] = json!(message);
                body["rawResponse"] = json!(raw);
            }
            ShiplensError::GenerationFailed { primary, fallback } => {
                body["details"] = json!({"primary": primary, "fallback": fallback});
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
