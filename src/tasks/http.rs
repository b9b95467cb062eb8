// ABOUTME: HTTP task implementation for issuing web requests
// ABOUTME: Sends the configured method, headers, and body and returns the response text

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{Result, TaskError};
use super::TaskBackend;
use crate::parser::TaskConfig;

pub struct HttpTask {
    client: reqwest::Client,
}

impl Default for HttpTask {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTask {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn parse_method(method: Option<&str>) -> Result<reqwest::Method> {
        let method = method.unwrap_or("GET").to_uppercase();
        reqwest::Method::from_bytes(method.as_bytes()).map_err(|_| TaskError::InvalidMethod(method))
    }

    async fn send(&self, task: &TaskConfig) -> Result<String> {
        let url = task.params.url.as_deref().ok_or_else(|| {
            TaskError::InvalidConfig(format!("task '{}' needs a 'url'", task.name))
        })?;
        let method = Self::parse_method(task.params.method.as_deref())?;

        debug!("HTTP {} {}", method, url);

        let mut request = self.client.request(method, url);
        for (key, value) in &task.params.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &task.params.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() >= 400 {
            return Err(TaskError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl TaskBackend for HttpTask {
    async fn execute(&self, task: &TaskConfig, cancel: CancellationToken) -> Result<String> {
        tokio::select! {
            result = self.send(task) => result,
            _ = cancel.cancelled() => Err(TaskError::Cancelled),
        }
    }

    fn task_type(&self) -> &'static str {
        "http"
    }
}
