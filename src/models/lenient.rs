//! Forgiving field readers for model-generated JSON.
//!
//! The model is asked for a fixed shape but routinely returns numbers as
//! strings, drops fields, or emits an element that is not an object. These
//! helpers turn such deviations into defaults instead of failing the whole
//! report.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

/// Returns the string content of a field, or `None` for anything that is
/// not a JSON string.
pub fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Reads any scalar as text. Numbers and booleans keep their JSON spelling,
/// null becomes the empty string.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Like [`text`] but keeps absence distinct from an empty value.
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("numeric prefix pattern is a valid regex")
    })
}

/// Interprets a JSON value as a number. Strings are stripped of everything
/// except digits, `.` and `-`, then the longest leading number is read, so
/// `"$1,204.50"` reads as `1204.5` and the range `"10-20"` as `10`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            numeric_prefix()
                .find(&cleaned)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Required numeric field. Unreadable values become `0.0`.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    match coerce_number(&raw) {
        Some(n) => Ok(n),
        None => {
            if !raw.is_null() {
                warn!(value = %raw, "Unparseable chart value, using 0");
            }
            Ok(0.0)
        }
    }
}

/// Optional numeric field. Unreadable values become `None`.
pub fn optional_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(coerce_number(&raw))
}

/// Non-negative count; anything else is dropped.
pub fn optional_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<usize>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(raw.as_u64().and_then(|n| usize::try_from(n).ok()))
}

/// Reads an array element by element, skipping elements that do not fit
/// `T`. A missing or non-array field yields an empty list.
pub fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let elements = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(elements)) => elements,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            debug!(kind = json_kind(&other), "Expected an array, ignoring field");
            return Ok(Vec::new());
        }
    };

    Ok(elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<T>(element) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable report element");
                None
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
