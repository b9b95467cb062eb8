// ABOUTME: Main library module for the taskflow orchestration engine
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod engine;
pub mod output;
pub mod parser;
pub mod tasks;
pub mod template;

// Re-export commonly used types
pub use cli::{App, AppInfo, Args, Config};
pub use engine::{
    ExecutionError, RunFailure, TaskResult, TaskStatus, WorkflowEngine, WorkflowResult,
    WorkflowStatus,
};
pub use output::OutputHandler;
pub use parser::{TaskConfig, Workflow, WorkflowParser};
pub use tasks::{TaskBackend, TaskRegistry};

// Error handling
pub type Result<T> = anyhow::Result<T>;
