use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;
use crate::errors::BoefjeError;
use tracing::{debug, warn};

/// Per-run location of the scanner's output file.
pub fn output_path(work_dir: &Path, extension: &str) -> PathBuf {
    work_dir.join(format!("output-{}.{}", uuid::Uuid::new_v4(), extension))
}

/// Remove a stale file so a scanner that writes nothing cannot relay old data.
pub async fn prepare(path: &Path) -> Result<(), BoefjeError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            BoefjeError::Output(format!("Cannot create work directory {}: {}", dir.display(), e))
        })?;
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale output file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BoefjeError::Output(format!(
            "Cannot clear output file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Read back the scanner output. The bytes are returned unchanged.
pub async fn read(path: &Path, expect_json: bool) -> Result<Vec<u8>, BoefjeError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BoefjeError::Output(format!(
                "Scanner did not produce an output file at {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(BoefjeError::Output(format!(
                "Cannot read output file {}: {}",
                path.display(),
                e
            )));
        }
    };

    if expect_json {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(BoefjeError::Output(format!("Output file {} is empty", path.display())));
        }
        serde_json::from_slice::<IgnoredAny>(&raw).map_err(|e| {
            BoefjeError::Output(format!("Output file {} is not valid JSON: {}", path.display(), e))
        })?;
    }

    Ok(raw)
}

pub async fn cleanup(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove output file"),
    }
}
