use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "scanner": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "kind": { "type": "string", "enum": ["nikto", "template"] },
                    "program": { "type": "string", "minLength": 1 },
                    "args": { "type": "array", "items": { "type": "string" } },
                    "output_extension": { "type": "string", "pattern": "^[A-Za-z0-9]+$" },
                    "expect_json": { "type": "boolean" },
                    "output_tags": { "type": "array", "items": { "type": "string", "minLength": 1 } },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "work_dir": { "type": "string" },
                    "keep_output": { "type": "boolean" }
                }
            },
            "api": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "user_agent": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
});
