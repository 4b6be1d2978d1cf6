pub mod config;
pub mod helpers;
pub mod result;

#[path = "engine/lib.rs"]
pub mod engine;
#[path = "task/lib.rs"]
pub mod task;
#[path = "api/lib.rs"]
pub mod api;

pub use config::{EngineConfig, ServerConfig};
pub use result::AutomationResult;
pub use task::{TaskController, TaskRecord, TaskStatus};
