use serde_json::Value;

use crate::errors::ShiplensError;

/// Remove a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[newline + 1..],
        _ => rest.trim_start_matches("json"),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Close brackets left open by a truncated response. The text is cut just
/// after the last `}` or `]` that sits outside a string, then the brackets
/// still open at that point are closed innermost first.
pub fn repair_truncated_json(text: &str) -> Option<String> {
    let mut stack: Vec<char> = Vec::new();
    let mut last_close: Option<(usize, Vec<char>)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(ch) {
                    return None;
                }
                last_close = Some((i, stack.clone()));
            }
            _ => {}
        }
    }

    let (end, open) = last_close?;
    if open.is_empty() {
        return None;
    }
    let mut repaired = text[..=end].to_string();
    repaired.extend(open.iter().rev());
    Some(repaired)
}

/// Recover a JSON object from a model answer: fenced, wrapped in chatter, or
/// cut off mid-way. Anything else is a response-shape error carrying the raw text.
pub fn extract_json(raw: &str) -> Result<Value, ShiplensError> {
    let stripped = strip_code_fences(raw);
    let first_error = match serde_json::from_str::<Value>(stripped) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };

    if let Some(start) = stripped.find('{') {
        if let Some(end) = stripped.rfind('}') {
            if start < end {
                let candidate = &stripped[start..=end];
                if let Ok(v) = serde_json::from_str::<Value>(candidate) {
                    return Ok(v);
                }
            }
        }
        if let Some(repaired) = repair_truncated_json(&stripped[start..]) {
            if let Ok(v) = serde_json::from_str::<Value>(&repaired) {
                return Ok(v);
            }
        }
    }

    Err(ShiplensError::ResponseShape {
        message: first_error.to_string(),
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_extract_from_chatter() {
        let v = extract_json("Here is your dashboard:\n{\"analysisTitle\": \"Freight\"}\nEnjoy!").unwrap();
        assert_eq!(v, json!({"analysisTitle": "Freight"}));
    }

    #[test]
    fn test_repair_truncated_response() {
        let raw = r#"{"analysisTitle": "Freight", "keyMetrics": [{"label": "Spend", "value": "$1M"}, {"label": "Lanes", "val"#;
        let v = extract_json(raw).unwrap();
        assert_eq!(v["keyMetrics"].as_array().unwrap().len(), 1);
        assert_eq!(v["analysisTitle"], "Freight");
    }

    #[test]
    fn test_repair_ignores_brackets_in_strings() {
        let repaired = repair_truncated_json(r#"{"a": [{"t": "x}]"}, {"t": "#).unwrap();
        assert_eq!(repaired, r#"{"a": [{"t": "x}]"}]}"#);
    }

    #[test]
    fn test_complete_json_needs_no_repair() {
        assert_eq!(repair_truncated_json("{\"a\": 1}"), None);
    }

    #[test]
    fn test_unrecoverable_text_keeps_raw() {
        let err = extract_json("I could not analyze this file.").unwrap_err();
        match err {
            ShiplensError::ResponseShape { raw, .. } => {
                assert_eq!(raw, "I could not analyze this file.")
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
