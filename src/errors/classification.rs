use super::types::BoefjeError;

/// Pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Setup,
    Fetch,
    Scan,
    Output,
    Report,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Fetch => "fetch",
            Self::Scan => "scan",
            Self::Output => "output",
            Self::Report => "report",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub stage: FailureStage,
}

impl BoefjeError {
    /// Classify this error by the pipeline stage it came from.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            BoefjeError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                stage: FailureStage::Setup,
            },
            BoefjeError::Fetch(_) => ErrorClassification {
                error_type: "FetchError",
                stage: FailureStage::Fetch,
            },
            BoefjeError::InvalidTask(_) => ErrorClassification {
                error_type: "InvalidTaskError",
                stage: FailureStage::Fetch,
            },
            BoefjeError::Scanner(_) => ErrorClassification {
                error_type: "ScannerError",
                stage: FailureStage::Scan,
            },
            BoefjeError::Output(_) => ErrorClassification {
                error_type: "OutputError",
                stage: FailureStage::Output,
            },
            BoefjeError::Report(_) => ErrorClassification {
                error_type: "ReportError",
                stage: FailureStage::Report,
            },

            // Raw IO/parse errors surface while handling the scanner output
            BoefjeError::Io(_) => ErrorClassification {
                error_type: "IoError",
                stage: FailureStage::Output,
            },
            BoefjeError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                stage: FailureStage::Output,
            },
            BoefjeError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                stage: FailureStage::Setup,
            },
        }
    }

    /// Process exit code for this error when it ends the run.
    pub fn exit_code(&self) -> i32 {
        match self.classify().stage {
            FailureStage::Setup => 2,
            FailureStage::Fetch => 3,
            FailureStage::Report => 4,
            FailureStage::Scan | FailureStage::Output => 1,
        }
    }
}
