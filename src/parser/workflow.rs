// ABOUTME: Core workflow data structures and parsing functionality
// ABOUTME: Defines the main Workflow struct and the YAML loader

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::error::{ParserError, Result, ValidationError};
use super::task::TaskConfig;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

impl Workflow {
    /// Parse workflow from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParserError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse workflow from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let workflow: Workflow = serde_yaml::from_str(content).map_err(ParserError::YamlError)?;
        workflow.validate_structure()?;
        Ok(workflow)
    }

    /// Validate basic workflow structure
    ///
    /// Task name uniqueness and dependency resolution are checked by the
    /// engine, not here.
    fn validate_structure(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ParserError::MissingField("name".to_string()));
        }

        if self.tasks.is_empty() {
            return Err(ParserError::ValidationError(ValidationError::EmptyWorkflow));
        }

        if let Some(index) = self.tasks.iter().position(|t| t.name.trim().is_empty()) {
            return Err(ParserError::MissingField(format!("tasks[{}].name", index)));
        }

        Ok(())
    }

    /// Get all task names in authoring order
    pub fn task_names(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.name.clone()).collect()
    }

    /// Get task configuration by name
    pub fn get_task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Convert workflow back to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ParserError::YamlError)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowParser;

impl WorkflowParser {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Workflow> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ParserError::IoError)?;
        self.parse_string(&content)
    }

    pub fn parse_string(&self, content: &str) -> Result<Workflow> {
        Workflow::from_yaml(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_workflow() {
        let yaml = r#"
name: test_workflow
description: A test workflow

variables:
  env: production

tasks:
  - name: hello
    type: shell
    command: echo "Hello World"
"#;

        let workflow = Workflow::from_yaml(yaml).unwrap();
        assert_eq!(workflow.name, "test_workflow");
        assert_eq!(workflow.description.as_deref(), Some("A test workflow"));
        assert_eq!(workflow.tasks.len(), 1);
        assert!(workflow.get_task("hello").is_some());
        assert_eq!(
            workflow.variables.get("env"),
            Some(&"production".to_string())
        );
    }

    #[test]
    fn test_parse_workflow_with_dependencies() {
        let yaml = r#"
name: dependency_test
tasks:
  - name: first
    type: shell
    command: echo first
  - name: second
    type: shell
    command: echo second
    depends_on: [first]
"#;

        let workflow = Workflow::from_yaml(yaml).unwrap();
        assert_eq!(workflow.task_names(), vec!["first", "second"]);
        assert_eq!(workflow.get_task("second").unwrap().depends_on, vec!["first"]);
    }

    #[test]
    fn test_workflow_validation_empty_name() {
        let yaml = r#"
name: ""
tasks:
  - name: test
    type: shell
    command: echo
"#;

        assert!(matches!(
            Workflow::from_yaml(yaml),
            Err(ParserError::MissingField(_))
        ));
    }

    #[test]
    fn test_workflow_validation_no_tasks() {
        let yaml = r#"
name: empty_workflow
tasks: []
"#;

        assert!(matches!(
            Workflow::from_yaml(yaml),
            Err(ParserError::ValidationError(ValidationError::EmptyWorkflow))
        ));
    }

    #[test]
    fn test_duplicate_names_are_left_to_the_engine() {
        let yaml = r#"
name: dupes
tasks:
  - name: same
    type: shell
    command: echo 1
  - name: same
    type: shell
    command: echo 2
"#;

        let workflow = Workflow::from_yaml(yaml).unwrap();
        assert_eq!(workflow.tasks.len(), 2);
    }

    #[test]
    fn test_workflow_file_round_trip() {
        let workflow = Workflow::from_yaml(
            r#"
name: test_workflow
tasks:
  - name: test
    type: file
    file_action: write
    file_path: /tmp/out.txt
    file_content: hi
"#,
        )
        .unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(workflow.to_yaml().unwrap().as_bytes())
            .unwrap();

        let loaded = Workflow::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.name, workflow.name);
        assert_eq!(loaded.tasks[0].params, workflow.tasks[0].params);
    }
}
