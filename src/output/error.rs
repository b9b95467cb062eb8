// ABOUTME: Error types for output handling operations
// ABOUTME: Covers unknown formats, report rendering, and report file writes

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no formatter registered for '{format}'")]
    FormatterNotFound { format: String },

    #[error("failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML report: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
