use std::collections::HashMap;

pub const HTTP_PROXY: &str = "HTTP_PROXY";
pub const USERAGENT: &str = "USERAGENT";
pub const CA_PATH: &str = "CA_PATH";

/// Proxy and TLS settings handed to the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanEnvironment {
    pub http_proxy: Option<String>,
    pub user_agent: Option<String>,
    pub ca_path: Option<String>,
    /// The task's own environment, available to argument templates.
    pub task: HashMap<String, String>,
}

impl ScanEnvironment {
    /// Settings from the task environment win over the process environment.
    /// Empty values count as unset.
    pub fn resolve<F>(task: HashMap<String, String>, process: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            task.get(key)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| process(key).filter(|v| !v.trim().is_empty()))
        };

        Self {
            http_proxy: lookup(HTTP_PROXY),
            user_agent: lookup(USERAGENT),
            ca_path: lookup(CA_PATH),
            task,
        }
    }

    /// Variables exported to the scanner process.
    pub fn exported_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(proxy) = &self.http_proxy {
            vars.push((HTTP_PROXY, proxy.clone()));
        }
        if let Some(ua) = &self.user_agent {
            vars.push((USERAGENT, ua.clone()));
        }
        if let Some(ca) = &self.ca_path {
            vars.push((CA_PATH, ca.clone()));
        }
        vars
    }
}
