// ABOUTME: Per-task supervision covering conditions, retries, and timeouts
// ABOUTME: Turns one task definition into exactly one recorded TaskResult

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::condition::Condition;
use super::result::{TaskResult, TaskStatus};
use crate::parser::TaskConfig;
use crate::tasks::{TaskError, TaskRegistry};
use crate::template::VariableResolver;

/// Pause taken between retry attempts.
#[async_trait]
pub trait RetryDelay: Send + Sync {
    async fn wait(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl RetryDelay for TokioDelay {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Returns immediately; useful where retries should not slow a run down.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RetryDelay for NoDelay {
    async fn wait(&self, _delay: Duration) {}
}

#[derive(Clone)]
pub struct TaskSupervisor {
    registry: Arc<TaskRegistry>,
    delay: Arc<dyn RetryDelay>,
}

impl TaskSupervisor {
    pub fn new(registry: Arc<TaskRegistry>, delay: Arc<dyn RetryDelay>) -> Self {
        Self { registry, delay }
    }

    /// Execute a task to completion.
    ///
    /// Never fails: backend errors, timeouts and cancellation all come back
    /// as a failed `TaskResult`. A timeout bounds the whole execution,
    /// retries and delays included, not each attempt separately.
    pub async fn execute_task(
        &self,
        task: &TaskConfig,
        resolver: &VariableResolver,
        cancel: &CancellationToken,
    ) -> TaskResult {
        if let Some(condition) = task.active_condition() {
            let resolved = resolver.resolve(condition);
            if !Condition::parse(&resolved).evaluate() {
                info!("Task {} condition not met, skipping", task.name);
                return TaskResult::skipped(&task.name, &task.task_type);
            }
        }

        let resolved = resolver.resolve_task(task);
        let policy = task.retry_policy();
        let max_attempts = policy.attempts();
        let deadline = task.timeout.map(|timeout| (Instant::now() + timeout, timeout));
        let task_cancel = cancel.child_token();

        let mut attempt = 0;
        let (outcome, start_time) = loop {
            attempt += 1;
            info!(
                "Executing task {} (attempt {}/{})",
                task.name, attempt, max_attempts
            );

            let started = Utc::now();
            let outcome = self.attempt(&resolved, deadline, &task_cancel).await;
            let retry = matches!(
                &outcome,
                Err(e) if attempt < max_attempts && !e.is_timeout() && !cancel.is_cancelled()
            );
            if !retry {
                break (outcome, started);
            }

            if let Err(e) = &outcome {
                warn!(
                    "Task {} failed (attempt {}/{}), retrying: {}",
                    task.name, attempt, max_attempts, e
                );
            }
            if !policy.delay.is_zero() {
                self.delay.wait(policy.delay).await;
            }
        };

        let mut result = match outcome {
            Ok(output) => {
                info!("Task {} completed successfully", task.name);
                TaskResult::success(&task.name, &task.task_type, output, start_time)
            }
            Err(e) => {
                error!("Task {} failed: {}", task.name, e);
                let status = if e.is_timeout() {
                    TaskStatus::TimedOut
                } else {
                    TaskStatus::Failed
                };
                TaskResult::failure(
                    &task.name,
                    &task.task_type,
                    status,
                    e.diagnostic_output(),
                    e.to_string(),
                    start_time,
                )
            }
        };
        result.attempts = attempt;
        result
    }

    async fn attempt(
        &self,
        task: &TaskConfig,
        deadline: Option<(Instant, Duration)>,
        cancel: &CancellationToken,
    ) -> Result<String, TaskError> {
        let Some((deadline, timeout)) = deadline else {
            return self.registry.execute_task(task, cancel.clone()).await;
        };

        if Instant::now() >= deadline {
            return Err(TaskError::Timeout(timeout));
        }

        match tokio::time::timeout_at(deadline, self.registry.execute_task(task, cancel.clone()))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!("Task {} hit its deadline, cancelling", task.name);
                cancel.cancel();
                Err(TaskError::Timeout(timeout))
            }
        }
    }
}
