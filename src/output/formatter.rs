// ABOUTME: Output formatters for workflow run results (JSON, YAML, text summary)
// ABOUTME: Handles serialization and presentation of workflow and task results

use serde_json::Value as JsonValue;

use super::error::{OutputError, Result};
use crate::engine::{TaskResult, TaskStatus, WorkflowResult};

const RULE: &str = "═══════════════════════════════════════════";

pub trait OutputFormatter: Send + Sync {
    fn format_workflow_result(&self, result: &WorkflowResult) -> Result<String>;

    fn format_task_result(&self, result: &TaskResult) -> Result<String>;
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

/// Human-readable execution summary.
pub struct TextFormatter {
    max_output_length: usize,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    fn render(&self, value: &JsonValue) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value).map_err(OutputError::Json)
        } else {
            serde_json::to_string(value).map_err(OutputError::Json)
        }
    }
}

fn seconds(duration: std::time::Duration) -> JsonValue {
    serde_json::Number::from_f64(duration.as_secs_f64())
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn task_value(result: &TaskResult) -> Result<JsonValue> {
    let mut value = serde_json::to_value(result)?;
    if let JsonValue::Object(map) = &mut value {
        map.insert("duration_seconds".to_string(), seconds(result.duration()));
    }
    Ok(value)
}

/// Report document shared by the JSON and YAML formatters
fn workflow_value(result: &WorkflowResult) -> Result<JsonValue> {
    let mut value = serde_json::to_value(result)?;
    if let JsonValue::Object(map) = &mut value {
        map.insert("duration_seconds".to_string(), seconds(result.duration()));
        let tasks = result
            .tasks
            .iter()
            .map(task_value)
            .collect::<Result<Vec<_>>>()?;
        map.insert("tasks".to_string(), JsonValue::Array(tasks));
    }
    Ok(value)
}

impl OutputFormatter for JsonFormatter {
    fn format_workflow_result(&self, result: &WorkflowResult) -> Result<String> {
        self.render(&workflow_value(result)?)
    }

    fn format_task_result(&self, result: &TaskResult) -> Result<String> {
        self.render(&task_value(result)?)
    }
}

impl Default for YamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for YamlFormatter {
    fn format_workflow_result(&self, result: &WorkflowResult) -> Result<String> {
        serde_yaml::to_string(&workflow_value(result)?).map_err(OutputError::Yaml)
    }

    fn format_task_result(&self, result: &TaskResult) -> Result<String> {
        serde_yaml::to_string(&task_value(result)?).map_err(OutputError::Yaml)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            max_output_length: 200,
        }
    }

    pub fn with_max_output_length(mut self, max_output_length: usize) -> Self {
        self.max_output_length = max_output_length;
        self
    }

    fn clip(&self, text: &str) -> String {
        let text = text.trim();
        if text.chars().count() > self.max_output_length {
            let clipped: String = text.chars().take(self.max_output_length).collect();
            format!("{}... [truncated]", clipped)
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_workflow_result(&self, result: &WorkflowResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(RULE);
        output.push_str("\n📊 Execution Summary\n");
        output.push_str(RULE);
        output.push('\n');

        for task in &result.tasks {
            output.push_str(&self.format_task_result(task)?);
            output.push('\n');
        }

        let successful = result.tasks.iter().filter(|t| t.is_successful()).count();
        let failed = result.tasks.len() - successful;

        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "Total: {} tasks | ✅ Success: {} | ❌ Failed: {}\n",
            result.tasks.len(),
            successful,
            failed
        ));
        output.push_str(&format!(
            "Total time: {:.2}s\n",
            result.duration().as_secs_f64()
        ));
        output.push_str(RULE);
        output.push('\n');

        Ok(output)
    }

    fn format_task_result(&self, result: &TaskResult) -> Result<String> {
        let icon = if result.is_successful() { "✅" } else { "❌" };
        let mut output = format!(
            "{} {} ({:.2}s)",
            icon,
            result.task_name,
            result.duration().as_secs_f64()
        );

        match result.status {
            TaskStatus::Skipped => output.push_str(" [skipped]"),
            TaskStatus::TimedOut => output.push_str(" [timed out]"),
            _ => {}
        }
        if result.attempts > 1 {
            output.push_str(&format!(" (attempts: {})", result.attempts));
        }

        match &result.error {
            Some(error) => {
                output.push_str(&format!("\n   Error: {}", self.clip(error)));
            }
            None if !result.output.trim().is_empty() => {
                output.push_str(&format!("\n   Output: {}", self.clip(&result.output)));
            }
            None => {}
        }

        Ok(output)
    }
}
