// ABOUTME: Configuration management for the taskflow application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cap on parallel tasks running at once; 0 means no cap
    #[serde(default)]
    pub max_concurrent_tasks: usize,

    /// Defaults for workflow variables; the workflow's own values win
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            _ => Config::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local = [
            PathBuf::from("taskflow.yaml"),
            PathBuf::from("taskflow.yml"),
            PathBuf::from(".taskflow.yaml"),
            PathBuf::from(".taskflow.yml"),
        ];

        if let Some(path) = local.into_iter().find(|p| p.exists()) {
            return Some(path);
        }

        dirs::home_dir()
            .map(|home| home.join(".taskflow").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Merge TASKFLOW_* environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    fn merge_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(level) = lookup("TASKFLOW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TASKFLOW_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(max_tasks) = lookup("TASKFLOW_MAX_CONCURRENT") {
            self.max_concurrent_tasks = max_tasks
                .parse()
                .with_context(|| format!("Invalid TASKFLOW_MAX_CONCURRENT '{}'", max_tasks))?;
        }

        Ok(())
    }
}
