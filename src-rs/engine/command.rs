use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::types::{AgentHandle, AutomationEngine, EngineError};
use crate::result::AutomationResult;

#[derive(Clone, Debug)]
pub struct CommandConfig {
    pub program: String,
    pub args: Vec<String>,
    pub model: String,
}

/// Runs each task through a local agent executable.
///
/// The program is invoked as `program args... <task>` with `BROWSER_TASKS_MODEL` set in its
/// environment, and must print a JSON object with `final_result`, `urls` and `action_names`
/// on stdout before exiting successfully.
pub struct CommandEngine {
    cfg: CommandConfig,
}

impl CommandEngine {
    pub fn new(cfg: CommandConfig) -> Result<Self, EngineError> {
        if cfg.program.trim().is_empty() {
            return Err(EngineError::NotConfigured(
                "command engine selected but BROWSER_TASKS_COMMAND is empty".to_string(),
            ));
        }
        Ok(Self { cfg })
    }
}

#[async_trait]
impl AutomationEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    async fn create(&self, task: &str) -> Result<AgentHandle, EngineError> {
        Ok(AgentHandle {
            task: task.to_string(),
            model: self.cfg.model.clone(),
            remote_id: None,
        })
    }

    async fn run(&self, handle: AgentHandle) -> Result<AutomationResult, EngineError> {
        debug!(program = %self.cfg.program, "spawning agent command");
        let output = Command::new(&self.cfg.program)
            .args(&self.cfg.args)
            .arg(&handle.task)
            .env("BROWSER_TASKS_MODEL", &handle.model)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                EngineError::Run(format!("failed to spawn {}: {}", self.cfg.program, err))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.cfg.program, output.status)
            } else {
                stderr
            };
            return Err(EngineError::Run(message));
        }

        serde_json::from_slice(&output.stdout).map_err(|err| EngineError::Parse(err.to_string()))
    }
}
