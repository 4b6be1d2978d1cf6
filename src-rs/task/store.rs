use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::error::TaskError;
use super::types::TaskRecord;

/// In-memory task records keyed by id. Records are never evicted.
#[derive(Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, TaskRecord>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, task: &str) -> Result<TaskRecord, TaskError> {
        let record = TaskRecord::new(next_id(), task);
        let mut map = self.tasks.write().map_err(|_| TaskError::Poisoned)?;
        map.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Applies `apply` to the stored record under the write lock and returns the result.
    pub fn update<F>(&self, id: &str, apply: F) -> Result<Option<TaskRecord>, TaskError>
    where
        F: FnOnce(&mut TaskRecord),
    {
        let mut map = self.tasks.write().map_err(|_| TaskError::Poisoned)?;
        Ok(map.get_mut(id).map(|record| {
            apply(record);
            record.clone()
        }))
    }

    pub fn get(&self, id: &str) -> Result<Option<TaskRecord>, TaskError> {
        let map = self.tasks.read().map_err(|_| TaskError::Poisoned)?;
        Ok(map.get(id).cloned())
    }

    /// Every record, newest first.
    pub fn list(&self) -> Result<Vec<TaskRecord>, TaskError> {
        let map = self.tasks.read().map_err(|_| TaskError::Poisoned)?;
        let mut items: Vec<TaskRecord> = map.values().cloned().collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(items)
    }

    pub fn len(&self) -> usize {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn next_id() -> String {
    Uuid::new_v4().to_string()
}
