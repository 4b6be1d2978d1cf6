pub mod controller;
pub mod error;
pub mod runs;
pub mod store;
pub mod types;

pub use controller::TaskController;
pub use error::TaskError;
pub use runs::RunRegistry;
pub use store::TaskStore;
pub use types::{Relabel, TaskRecord, TaskStatus};
