use serde::Serialize;
use serde_json::Value;

use crate::errors::BoefjeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    fn parse(value: &str) -> Result<Self, BoefjeError> {
        match value.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(BoefjeError::InvalidTask(format!("Unsupported scheme: {}", other))),
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host, scheme and port a scanner is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanTarget {
    pub host: String,
    pub scheme: Scheme,
    pub port: u16,
}

impl ScanTarget {
    /// Derive the target from a serialized input OOI.
    ///
    /// Accepts IP address OOIs (`address`), hostname OOIs (`name`, or a
    /// nested `hostname`) and hostname HTTP URL OOIs (`netloc`, `scheme`,
    /// `port`). Nested references may be objects with a `name`/`address`
    /// field or plain strings.
    pub fn from_input(input: &Value) -> Result<Self, BoefjeError> {
        let object = input.as_object()
            .ok_or_else(|| BoefjeError::InvalidTask("Input OOI is not an object".into()))?;

        let host = ["address", "netloc", "hostname", "name"]
            .iter()
            .filter_map(|key| object.get(*key))
            .find_map(host_of)
            .ok_or_else(|| BoefjeError::InvalidTask("Input OOI has no address or hostname".into()))?;

        let port = match object.get("port") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_port(value)?),
        };

        let scheme = match object.get("scheme").and_then(Value::as_str) {
            Some(s) => Scheme::parse(s)?,
            None if port == Some(443) => Scheme::Https,
            None => Scheme::Http,
        };

        Ok(Self {
            port: port.unwrap_or_else(|| scheme.default_port()),
            host,
            scheme,
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == Scheme::Https
    }

    /// `scheme://host[:port]`, omitting the port when it is the scheme default.
    pub fn url(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == self.scheme.default_port() {
            format!("{}://{}", self.scheme, host)
        } else {
            format!("{}://{}:{}", self.scheme, host, self.port)
        }
    }
}

fn host_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(strip_reference(trimmed).to_string())
            }
        }
        Value::Object(map) => ["name", "address"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(host_of),
        _ => None,
    }
}

/// References look like `Hostname|internet|example.com`; keep the natural key.
fn strip_reference(value: &str) -> &str {
    if value.contains('|') {
        value.rsplit('|').next().unwrap_or(value)
    } else {
        value
    }
}

fn parse_port(value: &Value) -> Result<u16, BoefjeError> {
    let port = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match port {
        Some(p) if (1..=u16::MAX as u64).contains(&p) => Ok(p as u16),
        _ => Err(BoefjeError::InvalidTask(format!("Invalid port: {}", value))),
    }
}
