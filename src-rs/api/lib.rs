pub use crate::config::{EngineConfig, ServerConfig};
pub use crate::engine::{AutomationEngine, EngineError, EngineFactory};
pub use crate::result::AutomationResult;
pub use crate::task::{Relabel, TaskController, TaskError, TaskRecord, TaskStatus};

pub mod error;
pub mod handlers;
pub mod server;
