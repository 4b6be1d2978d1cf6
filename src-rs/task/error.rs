use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task description is required")]
    MissingTask,

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("task store lock poisoned")]
    Poisoned,
}
