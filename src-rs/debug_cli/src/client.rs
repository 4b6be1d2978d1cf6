use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::models::{CreateTaskRequest, CreatedTask, MessageResponse, TaskInfo};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("http {status}: {body}")]
    Status { status: u16, body: String },
}

impl ClientError {
    /// Errors worth polling through: transport failures and server-side statuses.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            ClientError::NotFound(_) => false,
        }
    }
}

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn create_task(&self, task: &str) -> Result<CreatedTask, ClientError> {
        let req = CreateTaskRequest {
            task: task.to_string(),
            metadata: json!({ "source": "browser-tasks-cli" }),
        };
        let resp = self.client.post(self.url("/tasks")).json(&req).send()?;
        decode(resp)
    }

    pub fn get_task(&self, id: &str) -> Result<TaskInfo, ClientError> {
        let resp = self.client.get(self.url(&format!("/tasks/{}", id))).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }
        decode(resp)
    }

    pub fn list_tasks(&self) -> Result<Vec<TaskInfo>, ClientError> {
        let resp = self.client.get(self.url("/tasks")).send()?;
        decode(resp)
    }

    /// `action` is one of `pause`, `resume`, `stop`.
    pub fn relabel(&self, id: &str, action: &str) -> Result<MessageResponse, ClientError> {
        let resp = self
            .client
            .put(self.url(&format!("/tasks/{}/{}", id, action)))
            .send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }
        decode(resp)
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json::<T>()?)
    } else {
        let body = resp.text().unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
