pub mod command;
pub mod nikto;
pub mod template;

use std::path::Path;

use crate::config::{ScanEnvironment, ScannerConfig, ScannerKind};
use crate::errors::BoefjeError;
use crate::task::ScanTarget;

pub use command::{ScanExit, ScannerCommand};
pub use nikto::NiktoScanner;
pub use template::TemplateScanner;

/// An external command-line scanner the boefje wraps.
pub trait Scanner: Send + Sync {
    /// Scanner name for logging
    fn name(&self) -> &str;

    /// Extension of the output file the scanner writes.
    fn output_extension(&self) -> &str;

    /// Whether the output file must hold a non-empty JSON document.
    fn expect_json(&self) -> bool;

    /// Build the invocation that scans `target` and writes to `output_path`.
    fn build_command(
        &self,
        target: &ScanTarget,
        env: &ScanEnvironment,
        output_path: &Path,
    ) -> Result<ScannerCommand, BoefjeError>;
}

pub fn build_scanner(config: &ScannerConfig) -> Result<Box<dyn Scanner>, BoefjeError> {
    match config.kind.unwrap_or_default() {
        ScannerKind::Nikto => Ok(Box::new(NiktoScanner::new(config.program.as_deref()))),
        ScannerKind::Template => {
            let program = config.program.as_deref()
                .ok_or_else(|| BoefjeError::Config("Template scanner requires 'program'".into()))?;
            let args = config.args.clone().unwrap_or_default();
            if args.is_empty() {
                return Err(BoefjeError::Config("Template scanner requires 'args'".into()));
            }
            Ok(Box::new(TemplateScanner::new(
                program,
                args,
                config.output_extension.as_deref(),
                config.expect_json.unwrap_or(false),
            )))
        }
    }
}
