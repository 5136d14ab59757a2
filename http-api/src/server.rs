//! HTTP server over the task service
//!
//! One route per service operation; conventions are POST=create, GET=read,
//! PUT=update, DELETE=delete. All failures pass through [`crate::error`].

use std::{net::SocketAddr, sync::Arc};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use taskboard_core::{service::TaskService, TaskRepository};
use tracing::info;

use crate::handlers::{
    create_task, delete_task, get_task, health, list_tasks, process_file, search_tasks,
    tasks_by_creator, update_task, AppState,
};

/// HTTP API server wrapping a [`TaskService`]
pub struct ApiServer<R> {
    service: Arc<TaskService<R>>,
}

impl<R: TaskRepository + 'static> ApiServer<R> {
    pub fn new(service: Arc<TaskService<R>>) -> Self {
        Self { service }
    }

    /// Create the router with all endpoints
    pub fn router(self) -> Router {
        let state = AppState {
            service: self.service,
        };

        Router::new()
            .route("/tasks", post(create_task::<R>).get(list_tasks::<R>))
            .route("/tasks/search", get(search_tasks::<R>))
            .route(
                "/tasks/:id",
                get(get_task::<R>)
                    .put(update_task::<R>)
                    .delete(delete_task::<R>),
            )
            .route("/tasks/by-creator/:created_by", get(tasks_by_creator::<R>))
            .route("/files/:name", post(process_file::<R>))
            .route("/health", get(health::<R>))
            .layer(middleware::from_fn(
                crate::request_logger::request_logging_middleware,
            ))
            .with_state(state)
    }

    /// Bind the listener and serve until the task is dropped
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))?;

        let app = self.router();

        info!("Starting taskboard API on {}", socket_addr);

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
