use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::rotation::KeyRotator;
use super::types::{AgentHandle, AutomationEngine, EngineError};
use crate::result::AutomationResult;

pub const DEFAULT_CLOUD_URL: &str = "https://api.browser-use.com";
pub const DEFAULT_MODEL: &str = "gemini-flash";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct CloudConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub poll_interval: Duration,
}

/// Runs tasks on a hosted browser-automation API: one call to start the run, then status
/// polls until the remote side reports a terminal state.
pub struct CloudEngine {
    cfg: CloudConfig,
    rotator: KeyRotator,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct StartedRun {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RemoteRun {
    status: String,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    urls_visited: Vec<String>,
    #[serde(default)]
    actions: Vec<String>,
}

impl CloudEngine {
    pub fn new(mut cfg: CloudConfig) -> Result<Self, EngineError> {
        if cfg.api_keys.is_empty() {
            return Err(EngineError::NotConfigured(
                "cloud engine selected but no BROWSER_USE_API_KEY found".to_string(),
            ));
        }
        if cfg.base_url.is_empty() {
            cfg.base_url = DEFAULT_CLOUD_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = DEFAULT_MODEL.to_string();
        }
        if cfg.poll_interval.is_zero() {
            cfg.poll_interval = DEFAULT_POLL_INTERVAL;
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| EngineError::NotConfigured(err.to_string()))?;
        Ok(Self {
            rotator: KeyRotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    /// Sends the request built by `build`, moving on to the next key only on credential
    /// problems. Each call tries every key once, starting from its own rotation slot.
    async fn send_with_failover<F>(&self, build: F) -> Result<String, EngineError>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let start = self.rotator.start();
        let mut last_err = None;
        for attempt in 0..self.rotator.len() {
            let key = self
                .rotator
                .key_at(start, attempt)
                .ok_or_else(|| EngineError::NotConfigured("no cloud API keys".to_string()))?;
            match send(build(key)).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_key_specific() => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| EngineError::Api("request failed".to_string())))
    }

    async fn fetch_run(&self, remote_id: &str) -> Result<RemoteRun, EngineError> {
        let url = self.endpoint(&format!("/api/v1/task/{}", remote_id));
        let body = self
            .send_with_failover(|key| self.client.get(&url).bearer_auth(key))
            .await?;
        serde_json::from_str(&body).map_err(|err| EngineError::Parse(err.to_string()))
    }
}

#[async_trait]
impl AutomationEngine for CloudEngine {
    fn name(&self) -> &str {
        "cloud"
    }

    async fn create(&self, task: &str) -> Result<AgentHandle, EngineError> {
        let payload = json!({
            "task": task,
            "llm_model": self.cfg.model,
        });

        let url = self.endpoint("/api/v1/run-task");
        let body = self
            .send_with_failover(|key| self.client.post(&url).bearer_auth(key).json(&payload))
            .await?;
        let started: StartedRun =
            serde_json::from_str(&body).map_err(|err| EngineError::Parse(err.to_string()))?;
        debug!(remote_id = %started.id, "cloud run created");
        Ok(AgentHandle {
            task: task.to_string(),
            model: self.cfg.model.clone(),
            remote_id: Some(started.id),
        })
    }

    async fn run(&self, handle: AgentHandle) -> Result<AutomationResult, EngineError> {
        let remote_id = handle
            .remote_id
            .ok_or_else(|| EngineError::Run("cloud run was never created".to_string()))?;

        loop {
            let run = self.fetch_run(&remote_id).await?;
            match run.status.as_str() {
                "finished" => {
                    return Ok(AutomationResult {
                        final_result: run.output,
                        urls: run.urls_visited,
                        action_names: run.actions,
                    })
                }
                "failed" => {
                    return Err(EngineError::Run(
                        run.error.unwrap_or_else(|| "remote task failed".to_string()),
                    ))
                }
                "stopped" => {
                    return Err(EngineError::Run(
                        run.error.unwrap_or_else(|| "remote task was stopped".to_string()),
                    ))
                }
                status => debug!(%remote_id, status, "cloud run pending"),
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }
}

async fn send(request: RequestBuilder) -> Result<String, EngineError> {
    let resp = request
        .send()
        .await
        .map_err(|err| EngineError::Network(err.to_string()))?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_client_error() || status.is_server_error() {
        return Err(match status.as_u16() {
            401 | 403 => EngineError::Auth(body),
            429 => EngineError::RateLimited(body),
            _ if status.is_server_error() => EngineError::Server(body),
            _ => EngineError::Api(format!("{}: {}", status.as_u16(), body)),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fail_initialisation() {
        let result = CloudEngine::new(CloudConfig {
            api_keys: Vec::new(),
            base_url: String::new(),
            model: String::new(),
            poll_interval: Duration::ZERO,
        });
        assert!(matches!(result, Err(EngineError::NotConfigured(_))));
    }

    #[test]
    fn fills_in_defaults() {
        let engine = CloudEngine::new(CloudConfig {
            api_keys: vec!["key".to_string()],
            base_url: String::new(),
            model: String::new(),
            poll_interval: Duration::ZERO,
        })
        .unwrap();
        assert_eq!(engine.cfg.model, DEFAULT_MODEL);
        assert_eq!(engine.cfg.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(
            engine.endpoint("/api/v1/run-task"),
            "https://api.browser-use.com/api/v1/run-task"
        );
    }
}
