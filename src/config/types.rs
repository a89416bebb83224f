use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BoefjeConfig {
    pub scanner: Option<ScannerConfig>,
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    #[default]
    Nikto,
    Template,
}

impl ScannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nikto => "nikto",
            Self::Template => "template",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "nikto" => Some(Self::Nikto),
            "template" => Some(Self::Template),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScannerConfig {
    pub kind: Option<ScannerKind>,
    /// Path or name of the scanner executable.
    pub program: Option<String>,
    /// Argument templates, only used by the template scanner.
    pub args: Option<Vec<String>>,
    pub output_extension: Option<String>,
    /// Require the output file to be non-empty, valid JSON.
    pub expect_json: Option<bool>,
    /// Tags attached to the relayed output file.
    pub output_tags: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub work_dir: Option<String>,
    pub keep_output: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ApiConfig {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}
