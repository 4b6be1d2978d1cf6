use std::env;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::{
    AutomationEngine, CloudConfig, CloudEngine, CommandConfig, CommandEngine, EngineError,
    EngineFactory,
};

fn load_keys_from_env(primary: &str, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Ok(raw) = env::var(primary) {
        keys.extend(split_keys(&raw));
    }
    for idx in 2..=10 {
        let key = format!("{}_{}", prefix, idx);
        if let Ok(value) = env::var(&key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    keys
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_cloud_keys() -> Vec<String> {
    load_keys_from_env("BROWSER_USE_API_KEY", "BROWSER_USE_API_KEY")
}

pub fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_opt(key).and_then(|value| value.parse::<T>().ok())
}

/// Splits `program arg arg` on whitespace.
pub fn split_command(raw: &str) -> (Option<String>, Vec<String>) {
    let mut parts = raw.split_whitespace().map(str::to_string);
    let program = parts.next();
    (program, parts.collect())
}

pub fn build_engine(cfg: &EngineConfig) -> Result<Arc<dyn AutomationEngine>, EngineError> {
    match cfg.kind.as_str() {
        "cloud" => {
            let engine = CloudEngine::new(CloudConfig {
                api_keys: cfg.api_keys.clone(),
                base_url: cfg.base_url.clone(),
                model: cfg.model.clone(),
                poll_interval: cfg.poll_interval,
            })?;
            Ok(Arc::new(engine))
        }
        "command" => {
            let engine = CommandEngine::new(CommandConfig {
                program: cfg.command.clone().unwrap_or_default(),
                args: cfg.command_args.clone(),
                model: cfg.model.clone(),
            })?;
            Ok(Arc::new(engine))
        }
        other => Err(EngineError::NotConfigured(format!(
            "unknown engine kind: {}",
            other
        ))),
    }
}

pub fn engine_factory(cfg: EngineConfig) -> EngineFactory {
    Arc::new(move || build_engine(&cfg))
}
