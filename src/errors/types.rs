use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoefjeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch task: {0}")]
    Fetch(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Scanner error: {0}")]
    Scanner(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Failed to report result: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
