// ABOUTME: Error types for task execution engine operations
// ABOUTME: Defines the run-level failures and the partial-result carrier

use thiserror::Error;

use super::result::WorkflowResult;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("circular or unmet dependencies, stuck tasks: {tasks:?}")]
    DependencyDeadlock { tasks: Vec<String> },

    #[error("task {task} failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("duplicate task name: {task}")]
    DuplicateTask { task: String },

    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A run that stopped on a fatal error, with everything recorded before it.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    #[source]
    pub error: ExecutionError,
    pub partial: WorkflowResult,
}

impl RunFailure {
    /// Results recorded before the run stopped
    pub fn results(&self) -> &WorkflowResult {
        &self.partial
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
