use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::commands::{RunArgs, ScannerArgs};
use crate::config::{self, BoefjeConfig, ScannerConfig, ScannerKind};
use crate::errors::BoefjeError;
use crate::runner::{BoefjeRunner, RunnerSettings};
use crate::scanner::build_scanner;
use crate::task::client::default_user_agent;
use crate::task::{TaskApiClient, TaskStatus};
use tracing::{info, warn};

/// Request timeout for the task API when the config sets none.
const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

pub async fn handle_run(args: RunArgs) -> Result<(), BoefjeError> {
    let file_config = load(&args.scanner).await?;

    let mut settings = build_settings(&args.scanner, &file_config);
    settings.keep_output |= args.keep_output;
    settings.scanner_timeout = args.timeout.map(Duration::from_secs).or(settings.scanner_timeout);
    settings.fallback_output_url = args.output_url.clone();

    let runner = build_runner(&args.scanner, &file_config, settings)?;
    let report = runner.run(&args.input_url).await?;

    match report.status {
        TaskStatus::Completed => info!(
            task_id = %report.task_id,
            payload_bytes = report.payload_bytes,
            "Boefje finished"
        ),
        TaskStatus::Failed => warn!(
            task_id = %report.task_id,
            error = report.error.as_deref().unwrap_or(""),
            "Boefje finished with a failed result"
        ),
    }

    Ok(())
}

pub(crate) async fn load(args: &ScannerArgs) -> Result<BoefjeConfig, BoefjeError> {
    config::load_config(args.config.as_deref().map(Path::new)).await
}

/// Scanner config from the file with CLI flags applied on top.
pub(crate) fn merged_scanner_config(args: &ScannerArgs, file_config: &BoefjeConfig) -> Result<ScannerConfig, BoefjeError> {
    let mut scanner = file_config.scanner.clone().unwrap_or_default();

    if let Some(kind) = &args.scanner {
        let parsed = ScannerKind::parse(kind)
            .ok_or_else(|| BoefjeError::Config(format!("Invalid scanner: {}", kind)))?;
        scanner.kind = Some(parsed);
    }
    if let Some(program) = &args.program {
        scanner.program = Some(program.clone());
    }
    if let Some(work_dir) = &args.work_dir {
        scanner.work_dir = Some(work_dir.clone());
    }

    Ok(scanner)
}

pub(crate) fn build_settings(args: &ScannerArgs, file_config: &BoefjeConfig) -> RunnerSettings {
    let scanner = file_config.scanner.clone().unwrap_or_default();
    RunnerSettings {
        work_dir: PathBuf::from(
            args.work_dir.clone()
                .or(scanner.work_dir)
                .unwrap_or_else(|| ".".to_string()),
        ),
        keep_output: scanner.keep_output.unwrap_or(false),
        output_tags: scanner.output_tags.unwrap_or_default(),
        scanner_timeout: scanner.timeout_secs.map(Duration::from_secs),
        fallback_output_url: None,
    }
}

pub(crate) fn build_runner(
    args: &ScannerArgs,
    file_config: &BoefjeConfig,
    settings: RunnerSettings,
) -> Result<BoefjeRunner, BoefjeError> {
    let scanner_config = merged_scanner_config(args, file_config)?;
    let scanner = build_scanner(&scanner_config)?;

    let api_config = file_config.api.clone().unwrap_or_default();
    let user_agent = api_config.user_agent.unwrap_or_else(default_user_agent);
    let timeout = Duration::from_secs(api_config.timeout_secs.unwrap_or(DEFAULT_API_TIMEOUT_SECS));
    let client = TaskApiClient::new(&user_agent, Some(timeout))?;

    Ok(BoefjeRunner::new(Arc::new(client), scanner, settings))
}
