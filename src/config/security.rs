use crate::errors::BoefjeError;

const DANGEROUS_PATTERNS: &[&str] = &[
    "../",
    "..\\",
    "$(",
    "`",
    "\0",
];

/// URI schemes rejected at the start of a value.
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "file:"];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), BoefjeError> {
    check_value(value, &[])?;
    Ok(())
}

fn check_value(value: &serde_yaml::Value, path: &[String]) -> Result<(), BoefjeError> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.to_lowercase();
            let scheme = DANGEROUS_SCHEMES
                .iter()
                .find(|scheme| lower.trim_start().starts_with(**scheme));
            let found = DANGEROUS_PATTERNS
                .iter()
                .find(|pattern| lower.contains(**pattern))
                .or(scheme);
            if let Some(pattern) = found {
                let path_str = if path.is_empty() { "root".to_string() } else { path.join(".") };
                return Err(BoefjeError::Config(
                    format!("Dangerous pattern '{}' found at config path: {}", pattern.escape_default(), path_str)
                ));
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = k.as_str().unwrap_or("unknown").to_string();
                let mut new_path = path.to_vec();
                new_path.push(key);
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let mut new_path = path.to_vec();
                new_path.push(format!("[{}]", i));
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_config_passes() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  program: ./nikto/program/nikto.pl\n  args: ['-h', '{host}']"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_ok());
    }

    #[test]
    fn test_directory_traversal_blocked() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  work_dir: ../../etc"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_err());
    }

    #[test]
    fn test_command_substitution_blocked() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  args: ['-h', '$(id)']"
        ).unwrap();
        let err = validate_security_patterns(&yaml).unwrap_err();
        assert!(err.to_string().contains("scanner.args.[1]"));
    }

    #[test]
    fn test_backtick_blocked() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "api:\n  user_agent: '`whoami`'"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_err());
    }

    #[test]
    fn test_file_uri_blocked() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  program: 'file:///bin/sh'"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_err());
    }

    #[test]
    fn test_file_word_inside_value_allowed() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "api:\n  user_agent: 'OpenKAT profile: default'\nscanner:\n  args: ['--profile:fast']"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_ok());
    }

    #[test]
    fn test_javascript_uri_blocked() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  args: [' JavaScript:alert(1)']"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_err());
    }

    #[test]
    fn test_output_file_placeholder_allowed() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  args: ['-o', '{output_file}']"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_ok());
    }

    #[test]
    fn test_numeric_values_pass() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>(
            "scanner:\n  timeout_secs: 600\n  keep_output: true"
        ).unwrap();
        assert!(validate_security_patterns(&yaml).is_ok());
    }
}
