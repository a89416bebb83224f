use std::path::Path;

use crate::config::ScanEnvironment;
use crate::errors::BoefjeError;
use crate::task::ScanTarget;
use super::command::ScannerCommand;
use super::Scanner;

pub const DEFAULT_NIKTO_PROGRAM: &str = "./nikto/program/nikto.pl";

/// Nikto web server scanner, writing its report as JSON.
pub struct NiktoScanner {
    program: String,
}

impl NiktoScanner {
    pub fn new(program: Option<&str>) -> Self {
        Self {
            program: program.unwrap_or(DEFAULT_NIKTO_PROGRAM).to_string(),
        }
    }
}

impl Scanner for NiktoScanner {
    fn name(&self) -> &str {
        "nikto"
    }

    fn output_extension(&self) -> &str {
        "json"
    }

    fn expect_json(&self) -> bool {
        true
    }

    fn build_command(
        &self,
        target: &ScanTarget,
        env: &ScanEnvironment,
        output_path: &Path,
    ) -> Result<ScannerCommand, BoefjeError> {
        let mut cmd = ScannerCommand::new(&self.program)
            .arg("-h")
            .arg(&target.host)
            .arg("-p")
            .arg(target.port.to_string())
            .arg(if target.is_https() { "-ssl" } else { "-nossl" });

        if let Some(proxy) = &env.http_proxy {
            cmd = cmd.arg("-useproxy").arg(proxy);
        }
        if let Some(ua) = &env.user_agent {
            cmd = cmd.arg("-useragent").arg(ua);
        }

        cmd = cmd
            .arg("-Format")
            .arg("json")
            .arg("-o")
            .arg(output_path.to_string_lossy())
            .arg("-ask")
            .arg("no")
            .arg("-nointeractive");

        for (key, value) in env.exported_vars() {
            cmd = cmd.env(key, value);
        }

        Ok(cmd)
    }
}
