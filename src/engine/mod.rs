// ABOUTME: Task execution engine module for taskflow
// ABOUTME: Handles round scheduling, task supervision, conditions, and result tracking

pub mod condition;
pub mod dependency;
pub mod error;
pub mod result;
pub mod scheduler;
pub mod store;
pub mod supervisor;

pub use condition::Condition;
pub use dependency::{validate_workflow, DependencyGraph, ExecutionPlan, PlannedRound};
pub use error::{ExecutionError, Result, RunFailure};
pub use result::{TaskResult, TaskStatus, WorkflowResult, WorkflowStatus, WorkflowSummary};
pub use scheduler::WorkflowEngine;
pub use store::ResultStore;
pub use supervisor::{NoDelay, RetryDelay, TaskSupervisor, TokioDelay};
