mod common;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use browser_tasks_rs::engine::{AutomationEngine, EngineError, EngineFactory};
use browser_tasks_rs::AutomationResult;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, spawn_with_factory, GatedEngine, TestApp};

async fn create(app: &TestApp, task: &str) -> Value {
    let resp = app
        .client
        .post(app.url("/tasks"))
        .json(&json!({ "task": task, "metadata": { "source": "test" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn fetch(app: &TestApp, id: &str) -> (StatusCode, Value) {
    let resp = app
        .client
        .get(app.url(&format!("/tasks/{}", id)))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn relabel(app: &TestApp, id: &str, action: &str) -> (StatusCode, Value) {
    let resp = app
        .client
        .put(app.url(&format!("/tasks/{}/{}", id, action)))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn created_task_reads_back_as_running() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;

    let created = create(&app, "Find the cheapest flight to Lisbon").await;
    assert_eq!(created["status"], "running");
    assert_eq!(created["task"], "Find the cheapest flight to Lisbon");
    assert_eq!(created["message"], "Task started successfully");

    let id = created["id"].as_str().unwrap();
    let (status, body) = fetch(&app, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["task"], "Find the cheapest flight to Lisbon");
    assert!(body["started_at"].is_string());
    assert!(body.get("completed_at").is_none());
    assert!(body.get("agent").is_none());
}

#[tokio::test]
async fn missing_or_blank_task_is_rejected() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;

    for body in [json!({}), json!({ "task": "" }), json!({ "task": "   " })] {
        let resp = app
            .client
            .post(app.url("/tasks"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Task description is required");
    }

    let resp = app
        .client
        .post(app.url("/tasks"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let listed: Vec<Value> = app
        .client
        .get(app.url("/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
    assert_eq!(app.builds(), 0);
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;

    let (status, body) = fetch(&app, "does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "id": "does-not-exist", "status": "not_found" }));

    for action in ["pause", "resume", "stop"] {
        let (status, body) = relabel(&app, "does-not-exist", action).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }
}

#[tokio::test]
async fn successful_run_is_visible_to_polling() {
    let engine = Arc::new(GatedEngine::default());
    let gate = engine.gate("Summarise the front page");
    let app = spawn_app(engine).await;

    let created = create(&app, "Summarise the front page").await;
    let id = created["id"].as_str().unwrap().to_string();

    gate.send(Ok(AutomationResult {
        final_result: Some("Three stories about rockets".to_string()),
        urls: vec!["https://news.example.com".to_string()],
        action_names: vec![
            "go_to_url".to_string(),
            "extract_content".to_string(),
            "done".to_string(),
        ],
    }))
    .unwrap();
    assert!(app.controller.wait(&id).await);

    let (status, body) = fetch(&app, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finished");
    assert!(body["completed_at"].is_string());
    assert_eq!(body["output"], "Three stories about rockets");
    assert_eq!(body["urls_visited"], json!(["https://news.example.com"]));
    assert_eq!(body["steps"], 3);
    assert_eq!(body["actions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn rejected_run_is_recorded_as_failed() {
    let engine = Arc::new(GatedEngine::default());
    let gate = engine.gate("Log into the bank");
    let app = spawn_app(engine).await;

    let created = create(&app, "Log into the bank").await;
    let id = created["id"].as_str().unwrap().to_string();

    gate.send(Err(EngineError::Run("two-factor prompt timed out".to_string())))
        .unwrap();
    app.controller.wait(&id).await;

    let (_, body) = fetch(&app, &id).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "two-factor prompt timed out");
    assert!(body["completed_at"].is_string());
}

#[tokio::test]
async fn relabels_only_change_the_status() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;
    let created = create(&app, "Compare laptop prices").await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = relabel(&app, &id, "pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Task marked as paused (the automation run cannot be paused mid-execution)"
    );
    assert_eq!(fetch(&app, &id).await.1["status"], "paused");

    relabel(&app, &id, "resume").await;
    let (_, body) = fetch(&app, &id).await;
    assert_eq!(body["status"], "running");
    assert!(body.get("completed_at").is_none());

    relabel(&app, &id, "stop").await;
    let (_, body) = fetch(&app, &id).await;
    assert_eq!(body["status"], "stopped");
    assert!(body["completed_at"].is_string());

    assert_eq!(app.controller.in_flight(), 1);
}

#[tokio::test]
async fn late_completion_overwrites_stop() {
    let engine = Arc::new(GatedEngine::default());
    let gate = engine.gate("Download the report");
    let app = spawn_app(engine).await;

    let created = create(&app, "Download the report").await;
    let id = created["id"].as_str().unwrap().to_string();

    relabel(&app, &id, "stop").await;
    assert_eq!(fetch(&app, &id).await.1["status"], "stopped");

    gate.send(Ok(AutomationResult::default())).unwrap();
    app.controller.wait(&id).await;
    assert_eq!(fetch(&app, &id).await.1["status"], "finished");
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;

    let mut ids = Vec::new();
    for task in ["first", "second", "third"] {
        ids.push(create(&app, task).await["id"].as_str().unwrap().to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let listed: Vec<Value> = app
        .client
        .get(app.url("/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed_ids: Vec<&str> = listed.iter().map(|t| t["id"].as_str().unwrap()).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
    assert_eq!(app.builds(), 1);
}

#[tokio::test]
async fn engine_init_failure_is_500_without_a_record() {
    let factory: EngineFactory =
        Arc::new(|| -> Result<Arc<dyn AutomationEngine>, EngineError> {
            Err(EngineError::NotConfigured("no BROWSER_USE_API_KEY found".to_string()))
        });
    let app = spawn_with_factory(factory, Arc::new(AtomicUsize::new(0))).await;

    let resp = app
        .client
        .post(app.url("/api/tasks"))
        .json(&json!({ "task": "Open the calendar" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to start task");
    assert!(app.controller.store().is_empty());
}

#[tokio::test]
async fn health_reports_counts() {
    let app = spawn_app(Arc::new(GatedEngine::default())).await;
    create(&app, "Check the weather").await;

    let body: Value = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tasks"], 1);
    assert_eq!(body["in_flight"], 1);
}
