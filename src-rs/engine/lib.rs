pub mod cloud;
pub mod command;
pub mod rotation;
pub mod types;

pub use cloud::{CloudConfig, CloudEngine};
pub use command::{CommandConfig, CommandEngine};
pub use rotation::KeyRotator;
pub use types::{AgentHandle, AutomationEngine, EngineError, EngineFactory};
