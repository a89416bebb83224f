use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use crate::config::ScanEnvironment;
use crate::errors::BoefjeError;
use crate::task::ScanTarget;
use super::command::ScannerCommand;
use super::Scanner;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_.-]+)\}").expect("placeholder pattern is valid")
});

/// A scanner described entirely by configuration: a program plus argument
/// templates.
///
/// Placeholders: `{host}`, `{scheme}`, `{port}`, `{url}`, `{output_file}`,
/// and the optional `{proxy}`, `{user_agent}`, `{ca_path}`, `{env.KEY}`.
/// An argument whose optional placeholder has no value is dropped, together
/// with a directly preceding literal flag (`-x`, `--xyz`).
pub struct TemplateScanner {
    program: String,
    args: Vec<String>,
    output_extension: String,
    expect_json: bool,
}

enum Resolved {
    Value(String),
    Absent,
}

impl TemplateScanner {
    pub fn new(program: &str, args: Vec<String>, output_extension: Option<&str>, expect_json: bool) -> Self {
        Self {
            program: program.to_string(),
            args,
            output_extension: output_extension.unwrap_or("txt").to_string(),
            expect_json,
        }
    }

    fn lookup(
        name: &str,
        target: &ScanTarget,
        env: &ScanEnvironment,
        output_path: &Path,
    ) -> Result<Resolved, BoefjeError> {
        let value = match name {
            "host" => Some(target.host.clone()),
            "scheme" => Some(target.scheme.to_string()),
            "port" => Some(target.port.to_string()),
            "url" => Some(target.url()),
            "output_file" => Some(output_path.to_string_lossy().into_owned()),
            "proxy" => return Ok(optional(env.http_proxy.clone())),
            "user_agent" => return Ok(optional(env.user_agent.clone())),
            "ca_path" => return Ok(optional(env.ca_path.clone())),
            other => match other.strip_prefix("env.") {
                Some(key) if is_env_key(key) => return Ok(optional(env.task.get(key).cloned())),
                _ => None,
            },
        };
        value
            .map(Resolved::Value)
            .ok_or_else(|| BoefjeError::Config(format!("Unknown placeholder: {{{}}}", name)))
    }

    /// Substitute placeholders in one argument; `None` when it must be dropped.
    /// Every placeholder is checked, even after an absent one.
    fn resolve_arg(
        template: &str,
        target: &ScanTarget,
        env: &ScanEnvironment,
        output_path: &Path,
    ) -> Result<Option<String>, BoefjeError> {
        let mut resolved = String::with_capacity(template.len());
        let mut absent = false;
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            resolved.push_str(&template[last..whole.start]);
            match Self::lookup(&caps[1], target, env, output_path)? {
                Resolved::Value(v) => resolved.push_str(&v),
                Resolved::Absent => absent = true,
            }
            last = whole.end;
        }
        resolved.push_str(&template[last..]);
        Ok((!absent).then_some(resolved))
    }
}

impl Scanner for TemplateScanner {
    fn name(&self) -> &str {
        Path::new(&self.program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.program)
    }

    fn output_extension(&self) -> &str {
        &self.output_extension
    }

    fn expect_json(&self) -> bool {
        self.expect_json
    }

    fn build_command(
        &self,
        target: &ScanTarget,
        env: &ScanEnvironment,
        output_path: &Path,
    ) -> Result<ScannerCommand, BoefjeError> {
        let mut args: Vec<String> = Vec::with_capacity(self.args.len());
        let mut pending_flag: Option<String> = None;

        for template in &self.args {
            if template.starts_with('-') && !PLACEHOLDER.is_match(template) {
                if let Some(flag) = pending_flag.replace(template.clone()) {
                    args.push(flag);
                }
                continue;
            }
            let flag = pending_flag.take();
            // flag and value are dropped together
            if let Some(value) = Self::resolve_arg(template, target, env, output_path)? {
                args.extend(flag);
                args.push(value);
            }
        }
        args.extend(pending_flag);

        let mut cmd = ScannerCommand::new(&self.program);
        cmd.args = args;
        for (key, value) in env.exported_vars() {
            cmd = cmd.env(key, value);
        }
        Ok(cmd)
    }
}

fn is_env_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn optional(value: Option<String>) -> Resolved {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => Resolved::Value(v),
        None => Resolved::Absent,
    }
}
