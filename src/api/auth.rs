use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;

/// Environment variable holding the bearer token. Unset or empty disables auth.
pub const API_TOKEN_ENV: &str = "SHIPLENS_API_TOKEN";

/// Compare an `Authorization` header against the expected token.
pub fn check_token(expected: Option<&str>, header: Option<&str>) -> Result<(), &'static str> {
    let Some(expected) = expected.filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    match header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err("Invalid API token"),
        None => Err("Missing Authorization header"),
    }
}

pub async fn api_auth_middleware(
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let expected = std::env::var(API_TOKEN_ENV).ok();
    let header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    check_token(expected.as_deref(), header)
        .map_err(|msg| (StatusCode::UNAUTHORIZED, Json(json!({"error": msg}))))?;

    Ok(next.run(request).await)
}
