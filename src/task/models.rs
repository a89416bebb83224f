use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag attached to the file of a failed result.
pub const ERROR_TAG: &str = "error/boefje";

/// Task descriptor served by the task API at the input URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoefjeInput {
    #[serde(default)]
    pub task_id: Option<String>,
    /// Where the result payload must be POSTed.
    pub output_url: String,
    pub boefje_meta: BoefjeMeta,
}

impl BoefjeInput {
    /// Identifier used in logs: the task id, falling back to the meta id.
    pub fn task_label(&self) -> &str {
        self.task_id
            .as_deref()
            .or(self.boefje_meta.id.as_deref())
            .unwrap_or("unknown")
    }
}

/// Metadata describing the job: which boefje, against which input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoefjeMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub boefje: Option<BoefjeRef>,
    #[serde(default)]
    pub input_ooi: Option<String>,
    #[serde(default)]
    pub arguments: TaskArguments,
    #[serde(default)]
    pub organization: Option<String>,
    /// Settings for this boefje, e.g. `USERAGENT` or `HTTP_PROXY`.
    #[serde(default)]
    pub environment: Option<HashMap<String, String>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl BoefjeMeta {
    pub fn environment(&self) -> HashMap<String, String> {
        self.environment.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoefjeRef {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskArguments {
    /// Serialized input OOI.
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw file relayed to the task API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base64 of the raw bytes.
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl OutputFile {
    pub fn from_bytes(name: Option<String>, raw: &[u8], tags: Vec<String>) -> Self {
        Self {
            name,
            content: STANDARD.encode(raw),
            tags,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content)
    }
}

/// Result payload POSTed to the output URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoefjeOutput {
    pub status: TaskStatus,
    #[serde(default)]
    pub files: Vec<OutputFile>,
}

impl BoefjeOutput {
    pub fn completed(raw: &[u8], tags: Vec<String>) -> Self {
        Self {
            status: TaskStatus::Completed,
            files: vec![OutputFile::from_bytes(None, raw, tags)],
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            status: TaskStatus::Failed,
            files: vec![OutputFile::from_bytes(
                None,
                message.as_bytes(),
                vec![ERROR_TAG.to_string()],
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_descriptor() {
        let input: BoefjeInput = serde_json::from_value(json!({
            "output_url": "http://boefje:8000/api/v0/tasks/abc",
            "boefje_meta": {
                "arguments": { "input": { "address": "46.23.85.171" } },
                "environment": {}
            }
        }))
        .unwrap();
        assert_eq!(input.output_url, "http://boefje:8000/api/v0/tasks/abc");
        assert_eq!(input.task_label(), "unknown");
        assert_eq!(input.boefje_meta.arguments.input.as_ref().unwrap()["address"], "46.23.85.171");
    }

    #[test]
    fn test_parse_full_descriptor() {
        let input: BoefjeInput = serde_json::from_value(json!({
            "task_id": "6f08f386-0dfe-4cd4-a1b4-91e95411c883",
            "output_url": "http://boefje:8000/api/v0/tasks/6f08f386",
            "boefje_meta": {
                "id": "6f08f386-0dfe-4cd4-a1b4-91e95411c883",
                "boefje": { "id": "nikto", "version": null },
                "input_ooi": "IPAddressV4|internet|46.23.85.171",
                "arguments": { "input": { "address": "46.23.85.171" } },
                "organization": "acme",
                "environment": { "USERAGENT": "OpenKAT" },
                "started_at": null,
                "ended_at": null
            }
        }))
        .unwrap();
        assert_eq!(input.task_label(), "6f08f386-0dfe-4cd4-a1b4-91e95411c883");
        assert_eq!(input.boefje_meta.boefje.as_ref().unwrap().id, "nikto");
        assert_eq!(input.boefje_meta.environment().get("USERAGENT").unwrap(), "OpenKAT");
    }

    #[test]
    fn test_null_environment_is_empty() {
        let meta: BoefjeMeta = serde_json::from_value(json!({ "environment": null })).unwrap();
        assert!(meta.environment().is_empty());
    }

    #[test]
    fn test_missing_output_url_rejected() {
        let result = serde_json::from_value::<BoefjeInput>(json!({ "boefje_meta": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_completed_payload_shape() {
        let output = BoefjeOutput::completed(b"[]", vec![]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value, json!({
            "status": "COMPLETED",
            "files": [{ "content": "W10=", "tags": [] }]
        }));
    }

    #[test]
    fn test_failed_payload_carries_error_tag() {
        let output = BoefjeOutput::failed("scanner exited with code 1");
        assert_eq!(output.status, TaskStatus::Failed);
        assert_eq!(output.files[0].tags, vec![ERROR_TAG.to_string()]);
        assert_eq!(output.files[0].decode().unwrap(), b"scanner exited with code 1");
    }

    #[test]
    fn test_binary_content_survives_encoding() {
        let raw: Vec<u8> = (0u8..=255).collect();
        let file = OutputFile::from_bytes(Some("output.bin".into()), &raw, vec![]);
        assert_eq!(file.decode().unwrap(), raw);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", TaskStatus::Completed), "COMPLETED");
        assert_eq!(TaskStatus::Failed.as_str(), "FAILED");
    }
}
