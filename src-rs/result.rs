use serde::{Deserialize, Serialize};

/// What an automation engine hands back once a run resolves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationResult {
    #[serde(default)]
    pub final_result: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub action_names: Vec<String>,
}

impl AutomationResult {
    pub fn steps(&self) -> usize {
        self.action_names.len()
    }
}
