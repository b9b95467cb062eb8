// ABOUTME: Task execution result types and workflow result aggregation
// ABOUTME: Defines result structures for individual tasks and complete workflow runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    Skipped,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_name: String,
    pub task_type: String,
    pub status: TaskStatus,
    pub output: String,
    pub error: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Success,
    PartialSuccess,
    Failed,
    Aborted,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowSummary {
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub failed_tasks: usize,
    pub skipped_tasks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_name: String,
    pub run_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: WorkflowStatus,
    pub tasks: Vec<TaskResult>,
    pub summary: WorkflowSummary,
    pub error: Option<String>,
}

impl TaskResult {
    pub fn success(
        task_name: impl Into<String>,
        task_type: impl Into<String>,
        output: String,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            task_type: task_type.into(),
            status: TaskStatus::Success,
            output,
            error: None,
            start_time,
            end_time: Utc::now(),
            attempts: 1,
        }
    }

    pub fn failure(
        task_name: impl Into<String>,
        task_type: impl Into<String>,
        status: TaskStatus,
        output: String,
        error: String,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            task_type: task_type.into(),
            status,
            output,
            error: Some(error),
            start_time,
            end_time: Utc::now(),
            attempts: 1,
        }
    }

    /// A task whose condition evaluated false; it counts as successful.
    pub fn skipped(task_name: impl Into<String>, task_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_name: task_name.into(),
            task_type: task_type.into(),
            status: TaskStatus::Skipped,
            output: "Skipped due to condition".to_string(),
            error: None,
            start_time: now,
            end_time: now,
            attempts: 0,
        }
    }

    /// Success flag used for dependency checks and output references
    pub fn is_successful(&self) -> bool {
        matches!(self.status, TaskStatus::Success | TaskStatus::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        !self.is_successful()
    }

    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl WorkflowResult {
    pub fn new(workflow_name: String, run_id: String) -> Self {
        Self {
            workflow_name,
            run_id,
            start_time: Utc::now(),
            end_time: None,
            status: WorkflowStatus::Success,
            tasks: Vec::new(),
            summary: WorkflowSummary::default(),
            error: None,
        }
    }

    pub fn add_task_result(&mut self, result: TaskResult) {
        self.tasks.push(result);
        self.update_summary();
    }

    pub fn get_task_result(&self, task_name: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.task_name == task_name)
    }

    pub fn has_failures(&self) -> bool {
        self.tasks.iter().any(|t| t.is_failed())
    }

    /// Finish the run, recording the run-level error if there was one
    pub fn mark_completed(&mut self, error: Option<String>) {
        self.end_time = Some(Utc::now());
        self.update_summary();
        self.status = match (&error, self.has_failures()) {
            (Some(_), _) => WorkflowStatus::Aborted,
            (None, false) => WorkflowStatus::Success,
            (None, true) if self.summary.failed_tasks == self.summary.total_tasks => {
                WorkflowStatus::Failed
            }
            (None, true) => WorkflowStatus::PartialSuccess,
        };
        self.error = error;
    }

    pub fn duration(&self) -> Duration {
        self.end_time
            .and_then(|end| (end - self.start_time).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }

    fn update_summary(&mut self) {
        let count = |status: TaskStatus| self.tasks.iter().filter(|t| t.status == status).count();

        self.summary = WorkflowSummary {
            total_tasks: self.tasks.len(),
            successful_tasks: count(TaskStatus::Success),
            failed_tasks: count(TaskStatus::Failed) + count(TaskStatus::TimedOut),
            skipped_tasks: count(TaskStatus::Skipped),
        };
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Skipped => write!(f, "skipped"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::TimedOut => write!(f, "timed_out"),
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Success => write!(f, "success"),
            WorkflowStatus::PartialSuccess => write!(f, "partial_success"),
            WorkflowStatus::Failed => write!(f, "failed"),
            WorkflowStatus::Aborted => write!(f, "aborted"),
        }
    }
}
