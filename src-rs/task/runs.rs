use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

/// Join handles of detached automation runs, keyed by task id.
#[derive(Default)]
pub struct RunRegistry {
    runs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the handle and drops handles of runs that already settled.
    pub fn register(&self, id: &str, handle: JoinHandle<()>) {
        let mut runs = self.lock();
        runs.retain(|_, run| !run.is_finished());
        runs.insert(id.to_string(), handle);
    }

    pub fn take(&self, id: &str) -> Option<JoinHandle<()>> {
        self.lock().remove(id)
    }

    pub fn in_flight(&self) -> usize {
        self.lock().values().filter(|run| !run.is_finished()).count()
    }

    pub fn drain(&self) -> Vec<(String, JoinHandle<()>)> {
        self.lock().drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn settled_runs_are_pruned_on_register() {
        let registry = RunRegistry::new();
        let done = tokio::spawn(async {});
        registry.register("done", done);
        tokio::time::sleep(Duration::from_millis(20)).await;

        registry.register("pending", tokio::spawn(std::future::pending::<()>()));
        assert_eq!(registry.in_flight(), 1);
        assert!(registry.take("done").is_none());

        let pending = registry.take("pending").unwrap();
        pending.abort();
        assert!(registry.drain().is_empty());
    }
}
