use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::ApiError;
use crate::task::{Relabel, TaskController, TaskRecord, TaskStatus};

#[derive(Debug, Deserialize, Default)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub id: String,
    pub status: TaskStatus,
    pub task: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn handle_health(
    State(controller): State<Arc<TaskController>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tasks": controller.store().len(),
        "in_flight": controller.in_flight(),
    }))
}

pub async fn handle_create(
    State(controller): State<Arc<TaskController>>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let task = req.task.unwrap_or_default();

    let record = controller
        .submit(&task)
        .await
        .map_err(|err| ApiError::from_task("start", err))?;

    Ok(Json(CreateTaskResponse {
        id: record.id,
        status: record.status,
        task: record.task,
        message: "Task started successfully".to_string(),
    }))
}

pub async fn handle_list(
    State(controller): State<Arc<TaskController>>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    controller
        .list()
        .map(Json)
        .map_err(|err| ApiError::from_task("list", err))
}

pub async fn handle_get(
    State(controller): State<Arc<TaskController>>,
    Path(id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError> {
    controller
        .get(&id)
        .map(Json)
        .map_err(ApiError::from_read)
}

pub async fn handle_pause(
    State(controller): State<Arc<TaskController>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    relabel(&controller, &id, Relabel::Pause)
}

pub async fn handle_resume(
    State(controller): State<Arc<TaskController>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    relabel(&controller, &id, Relabel::Resume)
}

pub async fn handle_stop(
    State(controller): State<Arc<TaskController>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    relabel(&controller, &id, Relabel::Stop)
}

fn relabel(
    controller: &TaskController,
    id: &str,
    relabel: Relabel,
) -> Result<Json<MessageResponse>, ApiError> {
    controller
        .relabel(id, relabel)
        .map_err(|err| ApiError::from_task(relabel.verb(), err))?;
    Ok(Json(MessageResponse {
        message: relabel.note(),
    }))
}
