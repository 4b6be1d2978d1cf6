use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::task::{TaskError, TaskStatus};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Read of an unknown id; answered with a `not_found` status marker.
    #[error("task not found: {0}")]
    UnknownTask(String),

    #[error("Task not found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Maps a controller error for `action` ("start", "list", "pause", ...). Anything that is
    /// not a client mistake is logged and answered with a generic message.
    pub fn from_task(action: &str, err: TaskError) -> Self {
        match err {
            TaskError::MissingTask => ApiError::BadRequest("Task description is required".to_string()),
            TaskError::NotFound(_) => ApiError::NotFound,
            other => {
                error!(error = %other, "failed to {} task", action);
                ApiError::Internal(format!("Failed to {} task", action))
            }
        }
    }

    /// Like `from_task`, but an unknown id answers with the `not_found` status marker that
    /// pollers of a single task expect.
    pub fn from_read(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => ApiError::UnknownTask(id),
            other => Self::from_task("get", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::UnknownTask(id) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "id": id, "status": TaskStatus::NotFound })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Task not found" })),
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}
