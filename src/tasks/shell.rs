// ABOUTME: Shell task implementation for running commands and scripts
// ABOUTME: Executes through the platform shell and captures stdout or stderr

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{Result, TaskError};
use super::TaskBackend;
use crate::parser::TaskConfig;

#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd.exe", "/c");
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

/// Runs `script` when present, otherwise `command`.
///
/// ```yaml
/// - name: build
///   type: shell
///   command: cargo build --release
///
/// - name: report
///   type: shell
///   script: |
///     echo "version ${version}"
///     ls -la target
/// ```
pub struct ShellTask;

#[async_trait]
impl TaskBackend for ShellTask {
    async fn execute(&self, task: &TaskConfig, cancel: CancellationToken) -> Result<String> {
        let command_line = task
            .params
            .script
            .as_deref()
            .or(task.params.command.as_deref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                TaskError::InvalidConfig(format!(
                    "task '{}' needs either 'command' or 'script'",
                    task.name
                ))
            })?;

        debug!(
            "Shell command for {}: {}",
            task.name,
            if command_line.chars().count() > 200 {
                format!("{}...", command_line.chars().take(200).collect::<String>())
            } else {
                command_line.to_string()
            }
        );

        let (shell, flag) = SHELL;
        let child = Command::new(shell)
            .arg(flag)
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TaskError::io(format!("failed to start {}", shell), e))?;

        let output = tokio::select! {
            output = child.wait_with_output() => {
                output.map_err(|e| TaskError::io("failed to wait for command", e))?
            }
            _ = cancel.cancelled() => return Err(TaskError::Cancelled),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(stdout)
        } else {
            Err(TaskError::CommandFailed {
                status: output.status.to_string(),
                stderr,
            })
        }
    }

    fn task_type(&self) -> &'static str {
        "shell"
    }
}
