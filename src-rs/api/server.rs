use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::api::handlers::{
    handle_create, handle_get, handle_health, handle_list, handle_pause, handle_resume,
    handle_stop,
};
use crate::config::ServerConfig;
use crate::helpers::engine_factory;
use crate::task::TaskController;

pub struct TaskServer {
    pub config: ServerConfig,
    pub controller: Arc<TaskController>,
}

impl TaskServer {
    pub fn new(config: ServerConfig, controller: Option<Arc<TaskController>>) -> Self {
        let controller = controller.unwrap_or_else(|| {
            Arc::new(TaskController::new(engine_factory(config.engine.clone())))
        });
        Self { config, controller }
    }

    pub fn router(&self) -> Router {
        build_router(self.controller.clone())
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn start(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        info!(addr = %listener.local_addr()?, engine = %self.config.engine.kind, "browser-tasks listening");
        self.serve(listener, shutdown_signal()).await
    }

    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        self.controller.shutdown(self.config.shutdown_grace).await;
        info!("server stopped");
        Ok(())
    }
}

/// Task routes, served both at the root and under `/api`.
fn task_routes() -> Router<Arc<TaskController>> {
    Router::new()
        .route("/tasks", get(handle_list).post(handle_create))
        .route("/tasks/{id}", get(handle_get))
        .route("/tasks/{id}/pause", put(handle_pause))
        .route("/tasks/{id}/resume", put(handle_resume))
        .route("/tasks/{id}/stop", put(handle_stop))
}

pub fn build_router(controller: Arc<TaskController>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .merge(task_routes())
        .nest("/api", task_routes())
        .layer(CorsLayer::permissive())
        .with_state(controller)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await
        }
    }
}
