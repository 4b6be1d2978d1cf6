use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AutomationResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Running,
    Paused,
    Finished,
    Failed,
    Stopped,
    /// Only ever reported for ids the store has never seen.
    NotFound,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Paused => "paused",
            TaskStatus::Finished => "finished",
            TaskStatus::Failed => "failed",
            TaskStatus::Stopped => "stopped",
            TaskStatus::NotFound => "not_found",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Finished | TaskStatus::Failed | TaskStatus::Stopped
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of one submitted task. The run handle lives in the run registry, never here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub status: TaskStatus,
    pub task: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls_visited: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
}

impl TaskRecord {
    pub fn new(id: String, task: &str) -> Self {
        Self {
            id,
            status: TaskStatus::Running,
            task: task.to_string(),
            started_at: Utc::now(),
            completed_at: None,
            output: None,
            error: None,
            urls_visited: None,
            actions: None,
            steps: None,
        }
    }

    pub fn finish(&mut self, result: AutomationResult) {
        self.status = TaskStatus::Finished;
        self.completed_at = Some(Utc::now());
        self.steps = Some(result.steps());
        self.output = result.final_result;
        self.urls_visited = Some(result.urls);
        self.actions = Some(result.action_names);
    }

    pub fn fail(&mut self, message: String) {
        self.status = TaskStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(message);
    }

    /// Overwrites the status label. Nothing guards against relabeling a settled task.
    pub fn relabel(&mut self, relabel: Relabel) {
        self.status = relabel.status();
        if relabel == Relabel::Stop {
            self.completed_at = Some(Utc::now());
        }
    }
}

/// Status overrides a client may request. None of them reach the automation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relabel {
    Pause,
    Resume,
    Stop,
}

impl Relabel {
    pub fn status(self) -> TaskStatus {
        match self {
            Relabel::Pause => TaskStatus::Paused,
            Relabel::Resume => TaskStatus::Running,
            Relabel::Stop => TaskStatus::Stopped,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Relabel::Pause => "pause",
            Relabel::Resume => "resume",
            Relabel::Stop => "stop",
        }
    }

    pub fn note(self) -> String {
        let detail = match self {
            Relabel::Pause => "the automation run cannot be paused mid-execution",
            Relabel::Resume => "the automation run cannot be resumed",
            Relabel::Stop => "the automation run cannot be stopped mid-execution",
        };
        format!("Task marked as {} ({})", self.status(), detail)
    }
}
