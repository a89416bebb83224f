use std::path::Path;
use crate::errors::BoefjeError;
use crate::task::ERROR_TAG;
use super::types::{BoefjeConfig, ScannerKind};
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

pub async fn parse_config(path: &Path) -> Result<BoefjeConfig, BoefjeError> {
    if !path.exists() {
        return Err(BoefjeError::Config(format!("Config file not found: {}", path.display())));
    }

    let unreadable = |e: std::io::Error| {
        BoefjeError::Config(format!("Cannot read config {}: {}", path.display(), e))
    };

    let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
    if metadata.len() > 1_048_576 {
        return Err(BoefjeError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await.map_err(unreadable)?;
    parse_config_str(&content)
}

/// Load the config file if one was given, otherwise fall back to defaults.
pub async fn load_config(path: Option<&Path>) -> Result<BoefjeConfig, BoefjeError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            parse_config(path).await
        }
        None => Ok(BoefjeConfig::default()),
    }
}

pub fn parse_config_str(content: &str) -> Result<BoefjeConfig, BoefjeError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty file is a valid, empty config
    if yaml.is_null() {
        return Ok(BoefjeConfig::default());
    }

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: BoefjeConfig = serde_yaml::from_value(yaml)?;
    validate_conflicts(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), BoefjeError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| BoefjeError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| BoefjeError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            return Err(BoefjeError::Config(format!(
                "Invalid configuration: {}",
                messages.join("; ")
            )));
        }
    }

    Ok(())
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &BoefjeConfig) -> Result<(), BoefjeError> {
    let Some(scanner) = &config.scanner else {
        return Ok(());
    };

    match scanner.kind.unwrap_or_default() {
        ScannerKind::Template => {
            if scanner.program.is_none() {
                return Err(BoefjeError::Config("Template scanner requires 'program'".into()));
            }
            if scanner.args.as_ref().map_or(true, |a| a.is_empty()) {
                return Err(BoefjeError::Config("Template scanner requires 'args'".into()));
            }
        }
        ScannerKind::Nikto => {
            if scanner.args.is_some() {
                warn!("'args' is ignored by the nikto scanner");
            }
        }
    }

    if let Some(tags) = &scanner.output_tags {
        if tags.iter().any(|t| t == ERROR_TAG) {
            return Err(BoefjeError::Config(format!(
                "Output tags must not contain the failure tag '{}'",
                ERROR_TAG
            )));
        }
    }

    Ok(())
}
