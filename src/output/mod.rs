// ABOUTME: Output handler module for run summaries and report files
// ABOUTME: Picks a formatter by name or file extension and sends the result to a writer

pub mod error;
pub mod formatter;
pub mod writer;

use std::collections::HashMap;
use std::path::Path;

pub use self::error::{OutputError, Result};
pub use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter, YamlFormatter};
pub use self::writer::{FileWriter, OutputWriter, StdoutWriter};
use crate::engine::WorkflowResult;

pub struct OutputHandler {
    formatters: HashMap<String, Box<dyn OutputFormatter>>,
}

impl OutputHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            formatters: HashMap::new(),
        };

        handler.register_formatter("json", Box::new(JsonFormatter::new_pretty()));
        handler.register_formatter("yaml", Box::new(YamlFormatter::new()));
        handler.register_formatter("text", Box::new(TextFormatter::new()));

        handler
    }

    pub fn register_formatter(&mut self, name: &str, formatter: Box<dyn OutputFormatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    pub fn format(&self, format: &str, result: &WorkflowResult) -> Result<String> {
        let formatter =
            self.formatters
                .get(format)
                .ok_or_else(|| OutputError::FormatterNotFound {
                    format: format.to_string(),
                })?;
        formatter.format_workflow_result(result)
    }

    /// Report format implied by a file name: YAML for .yaml/.yml, JSON otherwise
    pub fn format_for_path(path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => "yaml",
            _ => "json",
        }
    }

    /// Print the execution summary to stdout
    pub async fn print_summary(&self, result: &WorkflowResult) -> Result<()> {
        let summary = self.format("text", result)?;
        StdoutWriter.write(&summary).await
    }

    /// Write the full run report to a file
    pub async fn write_report(&self, result: &WorkflowResult, path: &Path) -> Result<()> {
        let report = self.format(Self::format_for_path(path), result)?;
        FileWriter::new(path).write(&report).await
    }

    pub fn list_formatters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
