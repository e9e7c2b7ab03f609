use tracing::debug;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference. An unset variable resolves to `None`.
pub fn resolve_credential(value: &str) -> Option<String> {
    match value.trim().strip_prefix('$') {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.trim().is_empty() => {
                debug!(var = %var_name, "Resolved credential from environment");
                Some(resolved)
            }
            _ => {
                debug!(var = %var_name, "Environment variable not set");
                None
            }
        },
        None if value.trim().is_empty() => None,
        None => Some(value.trim().to_string()),
    }
}

/// Replace every occurrence of a secret with `[REDACTED]`.
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}
