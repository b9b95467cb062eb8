// ABOUTME: File task implementation for local filesystem operations
// ABOUTME: Supports reading, writing, deleting, and copying single files

use async_trait::async_trait;
use std::str::FromStr;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{Result, TaskError};
use super::TaskBackend;
use crate::parser::TaskConfig;

pub struct FileTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Read,
    Write,
    Delete,
    Copy,
}

impl FromStr for FileAction {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(FileAction::Read),
            "write" => Ok(FileAction::Write),
            "delete" => Ok(FileAction::Delete),
            "copy" => Ok(FileAction::Copy),
            other => Err(TaskError::UnknownFileAction(other.to_string())),
        }
    }
}

fn required<'a>(task: &'a TaskConfig, field: &str, value: &'a Option<String>) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| {
        TaskError::InvalidConfig(format!("task '{}' needs '{}'", task.name, field))
    })
}

impl FileTask {
    async fn run_action(&self, action: FileAction, task: &TaskConfig) -> Result<String> {
        let params = &task.params;
        match action {
            FileAction::Read => {
                let path = required(task, "file_path", &params.file_path)?;
                fs::read_to_string(path)
                    .await
                    .map_err(|e| TaskError::io("failed to read file", e))
            }
            FileAction::Write => {
                let path = required(task, "file_path", &params.file_path)?;
                let content = params.file_content.as_deref().unwrap_or_default();
                fs::write(path, content)
                    .await
                    .map_err(|e| TaskError::io("failed to write file", e))?;
                Ok(format!("Successfully wrote to {}", path))
            }
            FileAction::Delete => {
                let path = required(task, "file_path", &params.file_path)?;
                fs::remove_file(path)
                    .await
                    .map_err(|e| TaskError::io("failed to delete file", e))?;
                Ok(format!("Successfully deleted {}", path))
            }
            FileAction::Copy => {
                let source = required(task, "source_path", &params.source_path)?;
                let dest = required(task, "dest_path", &params.dest_path)?;
                let data = fs::read(source)
                    .await
                    .map_err(|e| TaskError::io("failed to read source file", e))?;
                fs::write(dest, data)
                    .await
                    .map_err(|e| TaskError::io("failed to write destination file", e))?;
                Ok(format!("Successfully copied {} to {}", source, dest))
            }
        }
    }
}

#[async_trait]
impl TaskBackend for FileTask {
    async fn execute(&self, task: &TaskConfig, cancel: CancellationToken) -> Result<String> {
        let action: FileAction = task.params.file_action.as_deref().unwrap_or_default().parse()?;
        debug!("File action {:?} for task {}", action, task.name);

        tokio::select! {
            result = self.run_action(action, task) => result,
            _ = cancel.cancelled() => Err(TaskError::Cancelled),
        }
    }

    fn task_type(&self) -> &'static str {
        "file"
    }
}
