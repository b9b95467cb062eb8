// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides workflow builders, temp environments, and scripted mock backends

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use taskflow::engine::{NoDelay, WorkflowEngine};
use taskflow::parser::TaskConfig;
use taskflow::tasks::{TaskBackend, TaskError, TaskRegistry};

pub struct TestWorkflowBuilder {
    name: String,
    description: String,
    variables: Vec<(String, String)>,
    tasks: Vec<TestTask>,
}

#[derive(Clone, Default)]
pub struct TestTask {
    pub name: String,
    pub task_type: String,
    pub command: Option<String>,
    pub depends_on: Vec<String>,
    pub condition: Option<String>,
    pub timeout: Option<String>,
    pub retry_attempts: Option<u32>,
    pub continue_on_error: bool,
    pub parallel: bool,
}

impl TestTask {
    pub fn shell(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            task_type: "shell".to_string(),
            command: Some(command.to_string()),
            ..Default::default()
        }
    }

    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.depends_on = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }

    pub fn condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }
}

fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl TestWorkflowBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Test workflow: {}", name),
            variables: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_task(mut self, task: TestTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn add_echo_task(self, name: &str, message: &str) -> Self {
        self.with_task(TestTask::shell(name, &format!("echo {}", message)))
    }

    pub fn add_dependent_task(self, name: &str, message: &str, depends_on: Vec<&str>) -> Self {
        self.with_task(TestTask::shell(name, &format!("echo {}", message)).depends_on(&depends_on))
    }

    pub fn add_failing_task(self, name: &str) -> Self {
        self.with_task(TestTask::shell(name, "echo broken >&2; exit 3"))
    }

    pub fn add_retry_task(self, name: &str, max_attempts: u32) -> Self {
        let mut task = TestTask::shell(name, "exit 1");
        task.retry_attempts = Some(max_attempts);
        self.with_task(task)
    }

    pub async fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.generate_yaml()).await?;
        Ok(())
    }

    pub fn generate_yaml(&self) -> String {
        let mut yaml = format!(
            "name: {}\ndescription: {}\n\n",
            self.name,
            quoted(&self.description)
        );

        if !self.variables.is_empty() {
            yaml.push_str("variables:\n");
            for (key, value) in &self.variables {
                yaml.push_str(&format!("  {}: {}\n", key, quoted(value)));
            }
            yaml.push('\n');
        }

        yaml.push_str("tasks:\n");
        for task in &self.tasks {
            yaml.push_str(&format!("  - name: {}\n", task.name));
            yaml.push_str(&format!("    type: {}\n", task.task_type));

            if let Some(command) = &task.command {
                yaml.push_str(&format!("    command: {}\n", quoted(command)));
            }

            if !task.depends_on.is_empty() {
                yaml.push_str("    depends_on:\n");
                for dep in &task.depends_on {
                    yaml.push_str(&format!("      - {}\n", dep));
                }
            }

            if let Some(condition) = &task.condition {
                yaml.push_str(&format!("    condition: {}\n", quoted(condition)));
            }

            if let Some(timeout) = &task.timeout {
                yaml.push_str(&format!("    timeout: {}\n", timeout));
            }

            if let Some(attempts) = task.retry_attempts {
                yaml.push_str("    retry:\n");
                yaml.push_str(&format!("      max_attempts: {}\n", attempts));
                yaml.push_str("      delay: 0s\n");
            }

            if task.continue_on_error {
                yaml.push_str("    continue_on_error: true\n");
            }

            if task.parallel {
                yaml.push_str("    parallel: true\n");
            }
        }

        yaml
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn workflow_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.yaml", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.json", name))
    }

    pub async fn create_workflow_file(&self, name: &str, builder: &TestWorkflowBuilder) -> PathBuf {
        let workflow_file = self.workflow_file(name);
        builder
            .write_to_file(&workflow_file)
            .await
            .expect("Failed to write workflow file");
        workflow_file
    }
}

/// What the scripted backend does for one task.
#[derive(Clone)]
pub enum Script {
    /// Succeed with this output after the delay
    Succeed { output: String, delay: Duration },
    /// Fail this many times with the given stderr, then succeed with the output
    FlakyThenSucceed { failures: u32, output: String },
    /// Always fail with the given stderr
    Fail { stderr: String },
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub task: String,
    pub command: Option<String>,
    pub started: Instant,
    pub finished: Instant,
}

/// Mock backend keyed by task name. Records every invocation so tests can
/// check ordering, resolved fields, and overlap.
#[derive(Default)]
pub struct ScriptedBackend {
    scripts: HashMap<String, Script>,
    calls: Mutex<HashMap<String, u32>>,
    invocations: Mutex<Vec<Invocation>>,
    running: AtomicU32,
    peak_running: AtomicU32,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, task: &str, script: Script) -> Self {
        self.scripts.insert(task.to_string(), script);
        self
    }

    pub fn succeed(self, task: &str, output: &str) -> Self {
        self.script(
            task,
            Script::Succeed {
                output: output.to_string(),
                delay: Duration::ZERO,
            },
        )
    }

    pub fn slow(self, task: &str, delay: Duration) -> Self {
        self.script(
            task,
            Script::Succeed {
                output: task.to_string(),
                delay,
            },
        )
    }

    pub fn fail(self, task: &str, stderr: &str) -> Self {
        self.script(
            task,
            Script::Fail {
                stderr: stderr.to_string(),
            },
        )
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.task).collect()
    }

    pub fn calls(&self, task: &str) -> u32 {
        self.calls.lock().unwrap().get(task).copied().unwrap_or(0)
    }

    pub fn invocation(&self, task: &str) -> Option<Invocation> {
        self.invocations().into_iter().find(|i| i.task == task)
    }

    pub fn peak_running(&self) -> u32 {
        self.peak_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskBackend for ScriptedBackend {
    async fn execute(
        &self,
        task: &TaskConfig,
        _cancel: CancellationToken,
    ) -> taskflow::tasks::Result<String> {
        let started = Instant::now();
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(task.name.clone()).or_insert(0);
            *count += 1;
            *count
        };
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(running, Ordering::SeqCst);

        let script = self.scripts.get(&task.name).cloned().unwrap_or(Script::Succeed {
            output: task.name.clone(),
            delay: Duration::ZERO,
        });

        let outcome = match script {
            Script::Succeed { output, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(output)
            }
            Script::FlakyThenSucceed { failures, output } => {
                if call <= failures {
                    Err(TaskError::CommandFailed {
                        status: "exit status: 1".to_string(),
                        stderr: format!("attempt {} failed", call),
                    })
                } else {
                    Ok(output)
                }
            }
            Script::Fail { stderr } => Err(TaskError::CommandFailed {
                status: "exit status: 1".to_string(),
                stderr,
            }),
        };

        self.running.fetch_sub(1, Ordering::SeqCst);
        self.invocations.lock().unwrap().push(Invocation {
            task: task.name.clone(),
            command: task.params.command.clone(),
            started,
            finished: Instant::now(),
        });

        outcome
    }

    fn task_type(&self) -> &'static str {
        "mock"
    }
}

/// An engine whose only backend is the given mock, with retries that never sleep
pub fn mock_engine(backend: Arc<ScriptedBackend>) -> WorkflowEngine {
    let mut registry = TaskRegistry::empty();
    registry.register(backend);
    WorkflowEngine::with_registry(registry).with_delay(Arc::new(NoDelay))
}

/// A task handled by the mock backend
pub fn mock_task(name: &str, depends_on: &[&str]) -> TaskConfig {
    let mut task = TaskConfig::new(name, "mock");
    task.depends_on = depends_on.iter().map(|d| d.to_string()).collect();
    task
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_builder() {
        let builder = TestWorkflowBuilder::new("test_workflow")
            .with_description("Test workflow description")
            .with_variable("env", "test")
            .add_echo_task("task1", "Hello World")
            .add_dependent_task("task2", "Dependent task", vec!["task1"]);

        let yaml = builder.generate_yaml();

        assert!(yaml.contains("name: test_workflow"));
        assert!(yaml.contains("description: 'Test workflow description'"));
        assert!(yaml.contains("env: 'test'"));
        assert!(yaml.contains("- name: task1"));
        assert!(yaml.contains("- name: task2"));
        assert!(yaml.contains("depends_on:"));
    }

    #[test]
    fn test_environment_setup() {
        let env = TestEnvironment::new();
        assert!(env.path().exists());

        let workflow_file = env.workflow_file("test");
        assert!(workflow_file.to_string_lossy().contains("test.yaml"));
    }
}
