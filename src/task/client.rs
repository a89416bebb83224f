use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use crate::errors::BoefjeError;
use super::models::{BoefjeInput, BoefjeOutput};
use tracing::debug;

/// `boefje/<version> (<git hash>)`
pub fn default_user_agent() -> String {
    format!(
        "boefje/{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").unwrap_or("dev")
    )
}

/// The two calls a boefje makes against the task API.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// GET the task descriptor.
    async fn fetch_input(&self, url: &str) -> Result<BoefjeInput, BoefjeError>;

    /// POST the result payload.
    async fn submit_output(&self, url: &str, output: &BoefjeOutput) -> Result<(), BoefjeError>;
}

pub struct TaskApiClient {
    client: Client,
}

impl TaskApiClient {
    /// `HTTP_PROXY` belongs to the scanner; the task API is always reached directly.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, BoefjeError> {
        let mut builder = Client::builder().user_agent(user_agent).no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BoefjeError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TaskApi for TaskApiClient {
    async fn fetch_input(&self, url: &str) -> Result<BoefjeInput, BoefjeError> {
        debug!(url = %url, "Fetching task descriptor");

        let resp = self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BoefjeError::Fetch(format!("GET {} failed: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BoefjeError::Fetch(format!(
                "GET {} returned {}: {}",
                url,
                status,
                excerpt(&body)
            )));
        }

        let body = resp.bytes().await
            .map_err(|e| BoefjeError::Fetch(format!("Failed to read task body: {}", e)))?;
        serde_json::from_slice(&body)
            .map_err(|e| BoefjeError::Fetch(format!("Invalid task descriptor: {}", e)))
    }

    async fn submit_output(&self, url: &str, output: &BoefjeOutput) -> Result<(), BoefjeError> {
        debug!(url = %url, status = %output.status, files = output.files.len(), "Submitting result");

        let body = serde_json::to_vec(output)?;
        let resp = self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BoefjeError::Report(format!("POST {} failed: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BoefjeError::Report(format!(
                "POST {} returned {}: {}",
                url,
                status,
                excerpt(&body)
            )));
        }

        Ok(())
    }
}

fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(300)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    body[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_has_version() {
        assert!(default_user_agent().starts_with(&format!("boefje/{}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_excerpt_short_body_unchanged() {
        assert_eq!(excerpt(" not found \n"), "not found");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), 300);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_fetch_error() {
        let client = TaskApiClient::new("boefje-test", Some(Duration::from_secs(5))).unwrap();
        let err = client.fetch_input("http://127.0.0.1:1/api/v0/tasks/x").await.unwrap_err();
        assert!(matches!(err, BoefjeError::Fetch(_)));
    }
}
