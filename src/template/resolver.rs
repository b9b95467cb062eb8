// ABOUTME: Variable resolver for ${name} and ${task.output} placeholders
// ABOUTME: Substitutes workflow variables and recorded task outputs into task fields

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::store::ResultStore;
use crate::parser::{TaskConfig, TaskParams};

/// Substitutes placeholders against the workflow variables and the
/// outputs recorded so far in a run.
///
/// Resolution is total: a placeholder with nothing to substitute is left
/// in the text exactly as written.
#[derive(Debug, Clone)]
pub struct VariableResolver {
    variables: Arc<HashMap<String, String>>,
    store: ResultStore,
}

impl VariableResolver {
    pub fn new(variables: Arc<HashMap<String, String>>, store: ResultStore) -> Self {
        Self { variables, store }
    }

    /// Replace `${key}` for every variable, then `${task.output}` for every
    /// task recorded as successful.
    pub fn resolve(&self, text: &str) -> String {
        if !text.contains("${") {
            return text.to_string();
        }

        let mut resolved = text.to_string();
        for (key, value) in self.variables.iter() {
            resolved = resolved.replace(&format!("${{{}}}", key), value);
        }

        for (task_name, output) in self.store.successful_outputs() {
            resolved = resolved.replace(&format!("${{{}.output}}", task_name), &output);
        }

        resolved
    }

    fn resolve_opt(&self, value: &Option<String>) -> Option<String> {
        value.as_deref().map(|v| self.resolve(v))
    }

    /// A copy of the task with every string field resolved, condition included.
    /// The name, type, and dependency list are left untouched.
    pub fn resolve_task(&self, task: &TaskConfig) -> TaskConfig {
        let params = &task.params;
        let resolved_params = TaskParams {
            command: self.resolve_opt(&params.command),
            script: self.resolve_opt(&params.script),
            url: self.resolve_opt(&params.url),
            method: self.resolve_opt(&params.method),
            headers: params
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), self.resolve(v)))
                .collect(),
            body: self.resolve_opt(&params.body),
            file_action: self.resolve_opt(&params.file_action),
            file_path: self.resolve_opt(&params.file_path),
            file_content: self.resolve_opt(&params.file_content),
            source_path: self.resolve_opt(&params.source_path),
            dest_path: self.resolve_opt(&params.dest_path),
        };

        TaskConfig {
            params: resolved_params,
            condition: self.resolve_opt(&task.condition),
            ..task.clone()
        }
    }
}
