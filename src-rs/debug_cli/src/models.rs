use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub interval_secs: u64,
    pub follow: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskRequest {
    pub task: String,
    pub metadata: Value,
}

#[derive(Debug, Deserialize)]
pub struct CreatedTask {
    pub id: String,
    pub status: String,
    pub task: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub urls_visited: Option<Vec<String>>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
    #[serde(default)]
    pub steps: Option<usize>,
}

impl TaskInfo {
    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.status)
    }

    /// What the user sees once polling stops.
    pub fn result_text(&self) -> String {
        self.output
            .clone()
            .filter(|text| !text.is_empty())
            .or_else(|| self.error.clone().filter(|text| !text.is_empty()))
            .unwrap_or_else(|| "Task completed".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn is_terminal(status: &str) -> bool {
    matches!(status, "finished" | "failed" | "stopped")
}
