use std::time::Duration;

use crate::engine::cloud::{DEFAULT_CLOUD_URL, DEFAULT_MODEL};
use crate::helpers::{env_opt, env_parse, load_cloud_keys, split_command};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// `cloud` or `command`.
    pub kind: String,
    pub model: String,
    pub base_url: String,
    pub api_keys: Vec<String>,
    pub poll_interval: Duration,
    pub command: Option<String>,
    pub command_args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: "cloud".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_CLOUD_URL.to_string(),
            api_keys: Vec::new(),
            poll_interval: Duration::from_secs(2),
            command: None,
            command_args: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let (command, command_args) = match env_opt("BROWSER_TASKS_COMMAND") {
            Some(raw) => split_command(&raw),
            None => (None, Vec::new()),
        };
        Self {
            kind: env_opt("BROWSER_TASKS_ENGINE").unwrap_or(defaults.kind),
            model: env_opt("BROWSER_TASKS_MODEL").unwrap_or(defaults.model),
            base_url: env_opt("BROWSER_USE_BASE_URL").unwrap_or(defaults.base_url),
            api_keys: load_cloud_keys(),
            poll_interval: env_parse::<u64>("BROWSER_TASKS_POLL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            command,
            command_args,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long shutdown waits for in-flight runs before abandoning them.
    pub shutdown_grace: Duration,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            shutdown_grace: Duration::from_secs(5),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_opt("HOST").unwrap_or(defaults.host),
            port: env_parse::<u16>("PORT").unwrap_or(defaults.port),
            shutdown_grace: env_parse::<u64>("BROWSER_TASKS_SHUTDOWN_GRACE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_grace),
            engine: EngineConfig::from_env(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
