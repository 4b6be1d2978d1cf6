use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use super::error::TaskError;
use super::runs::RunRegistry;
use super::store::TaskStore;
use super::types::{Relabel, TaskRecord};
use crate::engine::{AutomationEngine, EngineError, EngineFactory};
use crate::result::AutomationResult;

const RUN_PANICKED: &str = "automation run panicked";

/// Owns the task store, the run registry and the shared automation engine.
///
/// The engine is built by `factory` on the first submission and reused for every task after
/// that. Runs are detached; their outcome is written back into the store when they settle,
/// regardless of any status a client set in the meantime.
pub struct TaskController {
    store: Arc<TaskStore>,
    runs: RunRegistry,
    engine: OnceCell<Arc<dyn AutomationEngine>>,
    factory: EngineFactory,
}

impl TaskController {
    pub fn new(factory: EngineFactory) -> Self {
        Self {
            store: Arc::new(TaskStore::new()),
            runs: RunRegistry::new(),
            engine: OnceCell::new(),
            factory,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    async fn engine(&self) -> Result<Arc<dyn AutomationEngine>, EngineError> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                let engine = (self.factory)()?;
                info!(engine = engine.name(), "automation engine initialised");
                Ok::<_, EngineError>(engine)
            })
            .await?;
        Ok(engine.clone())
    }

    pub async fn submit(&self, task: &str) -> Result<TaskRecord, TaskError> {
        if task.trim().is_empty() {
            return Err(TaskError::MissingTask);
        }

        let engine = self.engine().await?;
        let handle = engine.create(task).await?;
        let record = self.store.create(task)?;

        let store = self.store.clone();
        let id = record.id.clone();
        let join = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(engine.run(handle))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(EngineError::Run(RUN_PANICKED.to_string())));
            complete(&store, &id, outcome);
        });
        self.runs.register(&record.id, join);

        info!(task_id = %record.id, "task started");
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<TaskRecord, TaskError> {
        self.store
            .get(id)?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    pub fn list(&self) -> Result<Vec<TaskRecord>, TaskError> {
        self.store.list()
    }

    pub fn relabel(&self, id: &str, relabel: Relabel) -> Result<TaskRecord, TaskError> {
        let record = self
            .store
            .update(id, |record| record.relabel(relabel))?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        info!(task_id = %id, status = %record.status, "task relabeled");
        Ok(record)
    }

    /// Waits for the run behind `id` to settle. Returns false if no run is registered.
    pub async fn wait(&self, id: &str) -> bool {
        match self.runs.take(id) {
            Some(handle) => {
                if let Err(err) = handle.await {
                    warn!(task_id = %id, error = %err, "automation run did not complete");
                }
                true
            }
            None => false,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.runs.in_flight()
    }

    /// Gives in-flight runs up to `grace` to settle, then aborts the rest.
    pub async fn shutdown(&self, grace: Duration) {
        let runs = self.runs.drain();
        if runs.is_empty() {
            return;
        }
        info!(count = runs.len(), "waiting for in-flight runs");
        let deadline = tokio::time::Instant::now() + grace;
        for (id, mut handle) in runs {
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                warn!(task_id = %id, "abandoning automation run at shutdown");
                handle.abort();
            }
        }
    }
}

fn complete(store: &TaskStore, id: &str, outcome: Result<AutomationResult, EngineError>) {
    let updated = match outcome {
        Ok(result) => {
            info!(task_id = %id, steps = result.steps(), "task finished");
            store.update(id, move |record| record.finish(result))
        }
        Err(err) => {
            warn!(task_id = %id, error = %err, "task failed");
            let message = err.to_string();
            store.update(id, move |record| record.fail(message))
        }
    };
    if let Err(err) = updated {
        error!(task_id = %id, error = %err, "failed to record task outcome");
    }
}
