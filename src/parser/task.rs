// ABOUTME: Task configuration structures and parameter definitions
// ABOUTME: Defines the task definition, its action fields, and retry settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(flatten)]
    pub params: TaskParams,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    #[serde(
        with = "humantime_serde",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub continue_on_error: bool,
    #[serde(default)]
    pub parallel: bool,
}

/// Action fields for every built-in task type.
///
/// The fields live directly on the task mapping in YAML; each backend reads
/// the ones it understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskParams {
    // shell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    // http
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    // file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(with = "humantime_serde", default)]
    pub delay: Duration,
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: Duration::ZERO,
        }
    }
}

impl RetryConfig {
    /// Fixed-delay retry policy
    pub fn fixed_delay(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Number of attempts to make; zero is treated as a single attempt
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl TaskConfig {
    /// Create a task with no action fields set
    pub fn new(name: impl Into<String>, task_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            task_type: task_type.into(),
            params: TaskParams::default(),
            depends_on: Vec::new(),
            condition: None,
            retry: None,
            timeout: None,
            continue_on_error: false,
            parallel: false,
        }
    }

    /// The retry policy in effect, falling back to a single attempt
    pub fn retry_policy(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// The condition text, if one was given and it is not blank
    pub fn active_condition(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| !c.trim().is_empty())
    }
}
