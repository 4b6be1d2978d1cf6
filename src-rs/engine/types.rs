use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::result::AutomationResult;

/// Per-task handle produced by [`AutomationEngine::create`] and consumed by `run`.
#[derive(Clone, Debug)]
pub struct AgentHandle {
    pub task: String,
    pub model: String,
    /// Identifier assigned by a remote engine, if any.
    pub remote_id: Option<String>,
}

#[derive(Clone, Debug, Error)]
pub enum EngineError {
    #[error("engine not configured: {0}")]
    NotConfigured(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Parse(String),

    #[error("{0}")]
    Run(String),
}

impl EngineError {
    /// Errors tied to a specific credential, worth trying with the next key.
    pub fn is_key_specific(&self) -> bool {
        matches!(self, EngineError::Auth(_) | EngineError::RateLimited(_))
    }
}

/// External browser-automation agent. Implementations drive the browser; this crate only
/// starts runs and records what they return.
#[async_trait]
pub trait AutomationEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn create(&self, task: &str) -> Result<AgentHandle, EngineError>;

    async fn run(&self, handle: AgentHandle) -> Result<AutomationResult, EngineError>;
}

/// Builds the shared engine on first use.
pub type EngineFactory =
    Arc<dyn Fn() -> Result<Arc<dyn AutomationEngine>, EngineError> + Send + Sync>;
