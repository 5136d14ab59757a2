//! Request handlers, one per service operation

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_core::{
    service::{SearchParams, TaskService, DEFAULT_PAGE_SIZE},
    NewTaskItem, TaskDto, TaskRepository, UpdateTaskItem,
};

use crate::error::ApiError;

/// Shared handler state
pub struct AppState<R> {
    pub service: Arc<TaskService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Query-string shape of the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// POST /tasks
pub async fn create_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Json(new_task): Json<NewTaskItem>,
) -> Result<(StatusCode, Json<TaskDto>), ApiError> {
    let dto = state.service.create(new_task).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// GET /tasks
pub async fn list_tasks<R: TaskRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let dtos = state.service.get_all().await?;
    Ok(Json(dtos))
}

/// GET /tasks/search
pub async fn search_tasks<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let params = SearchParams {
        title: request.title,
        description: request.description,
        created_from: request.created_from,
        created_to: request.created_to,
        page: request.page.unwrap_or(0),
        page_size: request.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let dtos = state.service.search(params).await?;
    Ok(Json(dtos))
}

/// GET /tasks/:id
pub async fn get_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>, ApiError> {
    let dto = state.service.get_by_id(id).await?;
    Ok(Json(dto))
}

/// PUT /tasks/:id
pub async fn update_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateTaskItem>,
) -> Result<Json<TaskDto>, ApiError> {
    let dto = state.service.update(id, changes).await?;
    Ok(Json(dto))
}

/// DELETE /tasks/:id
///
/// Responds 200 with the boolean success flag; a missing id is
/// `{"deleted": false}`, not 404, by contract.
pub async fn delete_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.service.delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// GET /tasks/by-creator/:created_by
pub async fn tasks_by_creator<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Path(created_by): Path<String>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let dtos = state.service.tasks_by_creator(&created_by).await?;
    Ok(Json(dtos))
}

/// POST /files/:name
pub async fn process_file<R: TaskRepository>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let message = state.service.process_upload(&name, &body).await?;
    Ok(Json(json!({ "message": message })))
}

/// GET /health
pub async fn health<R: TaskRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Value>, ApiError> {
    state.service.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
