use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "provider": { "type": "string", "enum": ["groq", "openai", "openrouter", "gemini", "local"] },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "primary_model": { "type": "string" },
                    "fallback_model": { "type": "string" },
                    "max_tokens": { "type": "integer", "minimum": 1 },
                    "temperature": { "type": "number", "minimum": 0, "maximum": 2 }
                }
            },
            "ingest": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "sample_rows": { "type": "integer", "minimum": 1 }
                }
            },
            "session": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "store_path": { "type": "string" }
                }
            },
            "server": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            }
        }
    })
});
