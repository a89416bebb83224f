pub mod output;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use crate::config::ScanEnvironment;
use crate::errors::BoefjeError;
use crate::scanner::{Scanner, ScannerCommand};
use crate::task::{BoefjeInput, BoefjeOutput, ScanTarget, TaskApi, TaskStatus};
use tracing::{error, info, warn};

type EnvLookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Settings for a single run.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub work_dir: PathBuf,
    pub keep_output: bool,
    pub output_tags: Vec<String>,
    pub scanner_timeout: Option<Duration>,
    /// Where to report when the task itself cannot be fetched.
    pub fallback_output_url: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            keep_output: false,
            output_tags: Vec::new(),
            scanner_timeout: None,
            fallback_output_url: None,
        }
    }
}

/// What was delivered to the task API.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub task_id: String,
    pub status: TaskStatus,
    pub output_url: String,
    pub error: Option<String>,
    /// Size of the base64 content sent.
    pub payload_bytes: usize,
}

/// The invocation `run` would perform for a task, without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub task_id: String,
    pub output_url: String,
    pub scanner: String,
    pub target: ScanTarget,
    pub url: String,
    pub command: String,
}

pub struct BoefjeRunner {
    api: Arc<dyn TaskApi>,
    scanner: Box<dyn Scanner>,
    settings: RunnerSettings,
    process_env: Box<EnvLookup>,
}

impl BoefjeRunner {
    pub fn new(api: Arc<dyn TaskApi>, scanner: Box<dyn Scanner>, settings: RunnerSettings) -> Self {
        Self {
            api,
            scanner,
            settings,
            process_env: Box::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Replace the process environment lookup used for `HTTP_PROXY`,
    /// `USERAGENT` and `CA_PATH`.
    pub fn with_process_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.process_env = Box::new(lookup);
        self
    }

    /// Fetch the task, run the scanner and report the outcome.
    ///
    /// A failing scan is still a successful run as long as the FAILED result
    /// reaches the task API. An error means nothing could be delivered.
    pub async fn run(&self, input_url: &str) -> Result<RunReport, BoefjeError> {
        info!(input_url = %input_url, scanner = %self.scanner.name(), "Getting task");

        let input = match self.api.fetch_input(input_url).await {
            Ok(input) => input,
            Err(e) => {
                error!(error = %e, error_type = e.classify().error_type, "Could not fetch task");
                return self.report_fetch_failure(e).await;
            }
        };

        let task_id = input.task_label().to_string();
        let (payload, failure) = match self.execute(&input).await {
            Ok(raw) => {
                info!(task_id = %task_id, bytes = raw.len(), "Scan completed");
                let payload = BoefjeOutput::completed(&raw, self.settings.output_tags.clone());
                (payload, None)
            }
            Err(e) => {
                let class = e.classify();
                warn!(
                    task_id = %task_id,
                    error_type = class.error_type,
                    stage = %class.stage,
                    error = %e,
                    "Scan failed"
                );
                (BoefjeOutput::failed(&e.to_string()), Some(e.to_string()))
            }
        };

        let payload_bytes = payload.files.iter().map(|f| f.content.len()).sum();
        self.api.submit_output(&input.output_url, &payload).await?;
        info!(task_id = %task_id, status = %payload.status, "Result delivered");

        Ok(RunReport {
            task_id,
            status: payload.status,
            output_url: input.output_url,
            error: failure,
            payload_bytes,
        })
    }

    /// Scan the task's target and return the raw output file bytes.
    pub async fn execute(&self, input: &BoefjeInput) -> Result<Vec<u8>, BoefjeError> {
        let path = output::output_path(&self.settings.work_dir, self.scanner.output_extension());
        let command = self.command_for(input, &path)?;

        output::prepare(&path).await?;
        info!(task_id = %input.task_label(), command = %command.display(), "Running scanner");

        let result = match command.run(self.settings.scanner_timeout).await {
            Ok(exit) => {
                info!(duration_ms = exit.duration_ms, stdout_lines = exit.stdout_lines, "Scanner finished");
                output::read(&path, self.scanner.expect_json()).await
            }
            Err(e) => Err(e),
        };

        if !self.settings.keep_output {
            output::cleanup(&path).await;
        }
        result
    }

    /// Fetch the task and resolve the scanner invocation without running it.
    pub async fn plan(&self, input_url: &str) -> Result<RunPlan, BoefjeError> {
        let input = self.api.fetch_input(input_url).await?;
        let path = output::output_path(&self.settings.work_dir, self.scanner.output_extension());
        let target = target_of(&input)?;
        let command = self.command_for(&input, &path)?;

        Ok(RunPlan {
            task_id: input.task_label().to_string(),
            output_url: input.output_url.clone(),
            scanner: self.scanner.name().to_string(),
            url: target.url(),
            target,
            command: command.display(),
        })
    }

    fn command_for(&self, input: &BoefjeInput, path: &std::path::Path) -> Result<ScannerCommand, BoefjeError> {
        let target = target_of(input)?;
        let env = ScanEnvironment::resolve(input.boefje_meta.environment(), |key| (self.process_env)(key));
        self.scanner.build_command(&target, &env, path)
    }

    async fn report_fetch_failure(&self, e: BoefjeError) -> Result<RunReport, BoefjeError> {
        let Some(url) = &self.settings.fallback_output_url else {
            return Err(e);
        };

        let payload = BoefjeOutput::failed(&e.to_string());
        self.api.submit_output(url, &payload).await?;
        info!(output_url = %url, "Fetch failure reported to fallback output URL");

        Ok(RunReport {
            task_id: "unknown".to_string(),
            status: TaskStatus::Failed,
            output_url: url.clone(),
            error: Some(e.to_string()),
            payload_bytes: payload.files.iter().map(|f| f.content.len()).sum(),
        })
    }
}

fn target_of(input: &BoefjeInput) -> Result<ScanTarget, BoefjeError> {
    let ooi = input.boefje_meta.arguments.input.as_ref()
        .ok_or_else(|| BoefjeError::InvalidTask("Task has no input OOI".into()))?;
    ScanTarget::from_input(ooi)
}
