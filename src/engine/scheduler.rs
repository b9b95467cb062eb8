// ABOUTME: Round-based workflow scheduler with parallel and sequential task groups
// ABOUTME: Drives a workflow run to completion, deadlock, or fatal task failure

use chrono::Utc;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::error::{ExecutionError, RunFailure};
use super::result::{TaskResult, TaskStatus, WorkflowResult};
use super::store::ResultStore;
use super::supervisor::{RetryDelay, TaskSupervisor, TokioDelay};
use crate::parser::{TaskConfig, Workflow};
use crate::tasks::TaskRegistry;
use crate::template::VariableResolver;

pub struct WorkflowEngine {
    registry: Arc<TaskRegistry>,
    delay: Arc<dyn RetryDelay>,
    max_concurrent: usize,
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("task_types", &self.registry.list_supported_tasks())
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

impl WorkflowEngine {
    /// An engine with the built-in backends and no concurrency cap
    pub fn new() -> Self {
        Self::with_registry(TaskRegistry::new())
    }

    pub fn with_registry(registry: TaskRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            delay: Arc::new(TokioDelay),
            max_concurrent: 0,
        }
    }

    /// Replace how retry delays are waited out
    pub fn with_delay(mut self, delay: Arc<dyn RetryDelay>) -> Self {
        self.delay = delay;
        self
    }

    /// Cap the number of parallel tasks running at once; zero means no cap
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Run every task of the workflow once, in dependency order.
    ///
    /// On a fatal error the returned `RunFailure` still carries every result
    /// recorded before the run stopped.
    #[instrument(skip(self, workflow, cancel), fields(workflow_name = %workflow.name))]
    pub async fn run(
        &self,
        workflow: &Workflow,
        cancel: CancellationToken,
    ) -> Result<WorkflowResult, RunFailure> {
        let started = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut workflow_result = WorkflowResult::new(workflow.name.clone(), run_id.clone());

        info!(
            "Starting workflow execution: {} (run_id: {})",
            workflow.name, run_id
        );

        if let Some(task) = first_duplicate(&workflow.tasks) {
            return Err(abort(
                workflow_result,
                ExecutionError::DuplicateTask {
                    task: task.to_string(),
                },
            ));
        }

        let store = ResultStore::new();
        let resolver = VariableResolver::new(Arc::new(workflow.variables.clone()), store.clone());
        let supervisor = TaskSupervisor::new(Arc::clone(&self.registry), Arc::clone(&self.delay));
        let semaphore =
            (self.max_concurrent > 0).then(|| Arc::new(Semaphore::new(self.max_concurrent)));

        let mut executed: HashSet<&str> = HashSet::new();
        let mut round = 0;

        while executed.len() < workflow.tasks.len() {
            let ready: Vec<&TaskConfig> = workflow
                .tasks
                .iter()
                .filter(|t| !executed.contains(t.name.as_str()))
                .filter(|t| store.all_succeeded(&t.depends_on))
                .collect();

            if ready.is_empty() {
                let stuck: Vec<String> = workflow
                    .tasks
                    .iter()
                    .filter(|t| !executed.contains(t.name.as_str()))
                    .map(|t| t.name.clone())
                    .collect();
                error!("No runnable tasks left, stuck: {:?}", stuck);
                return Err(abort(
                    workflow_result,
                    ExecutionError::DependencyDeadlock { tasks: stuck },
                ));
            }

            round += 1;
            let (parallel, sequential): (Vec<&TaskConfig>, Vec<&TaskConfig>) =
                ready.into_iter().partition(|t| t.parallel);
            info!(
                "Round {}: {} parallel, {} sequential tasks",
                round,
                parallel.len(),
                sequential.len()
            );

            if !parallel.is_empty() {
                let results =
                    execute_parallel(&supervisor, &parallel, &resolver, &semaphore, &cancel).await;
                for (task, result) in parallel.iter().zip(results) {
                    executed.insert(task.name.as_str());
                    store.record(result.clone());
                    workflow_result.add_task_result(result);
                }
            }

            for task in sequential {
                let result = supervisor.execute_task(task, &resolver, &cancel).await;
                executed.insert(task.name.as_str());
                store.record(result.clone());

                let failure = result
                    .is_failed()
                    .then(|| result.error.clone().unwrap_or_default());
                workflow_result.add_task_result(result);

                if let Some(message) = failure {
                    if !task.continue_on_error {
                        return Err(abort(
                            workflow_result,
                            ExecutionError::TaskFailed {
                                task: task.name.clone(),
                                message,
                            },
                        ));
                    }
                    debug!("Task {} failed, continuing", task.name);
                }
            }
        }

        workflow_result.mark_completed(None);
        info!(
            "Workflow execution completed in {:?} with status: {}",
            started.elapsed(),
            workflow_result.status
        );

        Ok(workflow_result)
    }
}

/// Spawn every member of a parallel group and wait for all of them.
/// Results come back in group order.
async fn execute_parallel(
    supervisor: &TaskSupervisor,
    tasks: &[&TaskConfig],
    resolver: &VariableResolver,
    semaphore: &Option<Arc<Semaphore>>,
    cancel: &CancellationToken,
) -> Vec<TaskResult> {
    let handles: Vec<_> = tasks
        .iter()
        .map(|task| {
            let supervisor = supervisor.clone();
            let resolver = resolver.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();
            let task = (*task).clone();

            tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                supervisor.execute_task(&task, &resolver, &cancel).await
            })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .zip(tasks)
        .map(|(joined, task)| match joined {
            Ok(result) => result,
            Err(join_error) => {
                error!("Task {} join error: {}", task.name, join_error);
                TaskResult::failure(
                    &task.name,
                    &task.task_type,
                    TaskStatus::Failed,
                    String::new(),
                    ExecutionError::Join(join_error).to_string(),
                    Utc::now(),
                )
            }
        })
        .collect()
}

fn first_duplicate(tasks: &[TaskConfig]) -> Option<&str> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .map(|t| t.name.as_str())
        .find(|name| !seen.insert(*name))
}

fn abort(mut partial: WorkflowResult, error: ExecutionError) -> RunFailure {
    error!("Workflow {} stopped: {}", partial.workflow_name, error);
    partial.mark_completed(Some(error.to_string()));
    RunFailure { error, partial }
}
