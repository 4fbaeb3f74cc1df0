//! Task endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::repos::{Task, TaskRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, RecordId};
use crate::http::server::AppState;
use crate::models::{TaskDraft, TaskPatch};

/// Create task request
#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Task response
#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: String,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            created_at: t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct TaskCreatedResponse {
    pub message: &'static str,
    pub task_id: i64,
}

#[derive(Serialize)]
pub struct TaskUpdatedResponse {
    pub message: &'static str,
    pub task: TaskResponse,
}

/// POST /tasks - create a task
async fn create_task(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskCreatedResponse>), ApiError> {
    let draft = TaskDraft::new(
        req.title.as_deref().unwrap_or_default(),
        req.description.as_deref().unwrap_or_default(),
    )?;
    let task_id = TaskRepo::new(&state.pool).create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskCreatedResponse {
            message: "Task created successfully!",
            task_id,
        }),
    ))
}

/// GET /tasks - list all tasks
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = TaskRepo::new(&state.pool).list().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /tasks/{id} - get a single task
async fn get_task(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = TaskRepo::new(&state.pool).get(id).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// PUT /tasks/{id} - partial update
async fn update_task(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<TaskUpdatedResponse>, ApiError> {
    let task = TaskRepo::new(&state.pool).update(id, patch).await?;

    Ok(Json(TaskUpdatedResponse {
        message: "Task updated successfully",
        task: TaskResponse::from(task),
    }))
}

/// DELETE /tasks/{id}
async fn delete_task(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    TaskRepo::new(&state.pool).delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

/// Task routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
