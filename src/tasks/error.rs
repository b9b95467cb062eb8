// ABOUTME: Error types reported by task backends
// ABOUTME: Carries the diagnostic text a failed task surfaces as its output

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("unknown task type: {0}")]
    UnsupportedTaskType(String),

    #[error("unknown file action: {0}")]
    UnknownFileAction(String),

    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),

    #[error("command failed: {status}\nstderr: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: status code {status}")]
    HttpStatus { status: u16, body: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("task timed out after {0:?}")]
    Timeout(Duration),

    #[error("task cancelled")]
    Cancelled,
}

impl TaskError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        TaskError::Io {
            context: context.into(),
            source,
        }
    }

    /// Text recorded as the task's output when it fails
    pub fn diagnostic_output(&self) -> String {
        match self {
            TaskError::CommandFailed { stderr, .. } => stderr.clone(),
            TaskError::HttpStatus { body, .. } => body.clone(),
            _ => String::new(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_output() {
        let err = TaskError::CommandFailed {
            status: "exit status: 2".to_string(),
            stderr: "no such file".to_string(),
        };
        assert_eq!(err.diagnostic_output(), "no such file");
        assert!(err.to_string().contains("stderr: no such file"));

        let err = TaskError::HttpStatus {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.diagnostic_output(), "unavailable");
        assert_eq!(err.to_string(), "HTTP error: status code 503");

        assert_eq!(TaskError::Cancelled.diagnostic_output(), "");
    }
}
