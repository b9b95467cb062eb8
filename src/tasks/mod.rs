// ABOUTME: Task backends that carry out a single task action
// ABOUTME: Defines the backend trait and the registry that dispatches on task type

pub mod error;
pub mod file;
pub mod http;
pub mod shell;

pub use error::{Result, TaskError};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::parser::TaskConfig;

/// A concrete executor for one task type.
///
/// Backends see fields that have already been variable-resolved and must not
/// retry or apply timeouts themselves.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn execute(&self, task: &TaskConfig, cancel: CancellationToken) -> Result<String>;

    fn task_type(&self) -> &'static str;
}

#[derive(Clone)]
pub struct TaskRegistry {
    backends: HashMap<String, Arc<dyn TaskBackend>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(shell::ShellTask));
        registry.register(Arc::new(http::HttpTask::new()));
        registry.register(Arc::new(file::FileTask));

        registry
    }

    /// A registry with no backends registered
    pub fn empty() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Register a backend, replacing any existing one for the same type
    pub fn register(&mut self, backend: Arc<dyn TaskBackend>) {
        let task_type = backend.task_type().to_string();
        self.backends.insert(task_type, backend);
    }

    pub fn get_backend(&self, task_type: &str) -> Option<&Arc<dyn TaskBackend>> {
        self.backends.get(task_type)
    }

    pub async fn execute_task(
        &self,
        task: &TaskConfig,
        cancel: CancellationToken,
    ) -> Result<String> {
        match self.get_backend(&task.task_type) {
            Some(backend) => backend.execute(task, cancel).await,
            None => Err(TaskError::UnsupportedTaskType(task.task_type.clone())),
        }
    }

    pub fn list_supported_tasks(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.backends.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
