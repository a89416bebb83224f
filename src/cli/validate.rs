use std::path::PathBuf;

use crate::cli::commands::{ScannerArgs, ValidateArgs};
use crate::config::{self, ScanEnvironment};
use crate::errors::BoefjeError;
use crate::runner::output::output_path;
use crate::scanner::build_scanner;
use crate::task::{ScanTarget, Scheme};
use super::run::{build_settings, merged_scanner_config};
use tracing::debug;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), BoefjeError> {
    let path = PathBuf::from(&args.config);
    let file_config = config::parse_config(&path).await?;

    let scanner_config = merged_scanner_config(&ScannerArgs::default(), &file_config)?;
    let scanner = build_scanner(&scanner_config)?;

    // Dry run against a sample target so placeholder mistakes surface here
    let settings = build_settings(&ScannerArgs::default(), &file_config);
    let sample = ScanTarget {
        host: "example.com".to_string(),
        scheme: Scheme::Https,
        port: 443,
    };
    let command = scanner.build_command(
        &sample,
        &ScanEnvironment::default(),
        &output_path(&settings.work_dir, scanner.output_extension()),
    )?;
    debug!(command = %command.display(), "Sample scanner command");

    println!("Configuration is valid: {} (scanner: {})", args.config, scanner.name());
    Ok(())
}
