// ABOUTME: Parser module for YAML workflow definitions
// ABOUTME: Exports workflow parsing, validation errors, and data structures

pub mod error;
pub mod task;
pub mod workflow;

pub use error::{ParserError, ValidationError};
pub use task::{RetryConfig, TaskConfig, TaskParams};
pub use workflow::{Workflow, WorkflowParser};
