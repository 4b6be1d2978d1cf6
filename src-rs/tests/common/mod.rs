#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use browser_tasks_rs::api::server::build_router;
use browser_tasks_rs::engine::{AgentHandle, AutomationEngine, EngineError, EngineFactory};
use browser_tasks_rs::{AutomationResult, TaskController};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub type Outcome = Result<AutomationResult, EngineError>;

/// Engine whose runs stay pending until the test releases them.
#[derive(Default)]
pub struct GatedEngine {
    gates: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
}

impl GatedEngine {
    pub fn gate(&self, task: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(task.to_string(), rx);
        tx
    }
}

#[async_trait]
impl AutomationEngine for GatedEngine {
    fn name(&self) -> &str {
        "gated"
    }

    async fn create(&self, task: &str) -> Result<AgentHandle, EngineError> {
        Ok(AgentHandle {
            task: task.to_string(),
            model: "test".to_string(),
            remote_id: None,
        })
    }

    async fn run(&self, handle: AgentHandle) -> Outcome {
        let gate = self.gates.lock().unwrap().remove(&handle.task);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(EngineError::Run("gate dropped".to_string()))),
            None => std::future::pending().await,
        }
    }
}

pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub controller: Arc<TaskController>,
    pub engine_builds: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn builds(&self) -> usize {
        self.engine_builds.load(Ordering::SeqCst)
    }
}

pub async fn spawn_app(engine: Arc<GatedEngine>) -> TestApp {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let factory: EngineFactory =
        Arc::new(move || -> Result<Arc<dyn AutomationEngine>, EngineError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(engine.clone())
        });
    spawn_with_factory(factory, builds).await
}

pub async fn spawn_with_factory(factory: EngineFactory, builds: Arc<AtomicUsize>) -> TestApp {
    let controller = Arc::new(TaskController::new(factory));
    let app = build_router(controller.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    TestApp {
        base: format!("http://{}", addr),
        client: reqwest::Client::new(),
        controller,
        engine_builds: builds,
    }
}
