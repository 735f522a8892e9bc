//! Request handlers for the task and activity endpoints.

use super::envelope::Envelope;
use super::error::ApiError;
use crate::activity::domain::ActivityLogEntry;
use crate::activity::ports::ActivityLogRepository;
use crate::task::domain::{Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStatus};
use crate::task::ports::TaskRepository;
use crate::task::services::{CreateTaskRequest, TaskStoreService};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state.
pub type SharedTaskStore<R, L, C> = Arc<TaskStoreService<R, L, C>>;

type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

/// Query string accepted by `GET /tasks`.
///
/// Values arrive as raw strings so that unknown spellings are reported as
/// validation errors. Spellings must match exactly, as in request bodies.
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    status: Option<String>,
    priority: Option<String>,
}

impl ListTasksQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let mut filter = TaskFilter::all();
        if let Some(raw) = present(self.status) {
            filter = filter.with_status(TaskStatus::try_from(raw.as_str())?);
        }
        if let Some(raw) = present(self.priority) {
            filter = filter.with_priority(TaskPriority::try_from(raw.as_str())?);
        }
        Ok(filter)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.is_empty())
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse::<TaskId>().map_err(|_| ApiError::task_not_found())
}

/// Liveness payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_owned())
}

/// `POST /tasks`
pub async fn create_task<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let task = store.create(request).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(task))))
}

/// `GET /tasks`
pub async fn list_tasks<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Vec<Task>>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Query(params) = query?;
    let filter = params.into_filter()?;
    let tasks = store.list(&filter).await?;
    Ok((StatusCode::OK, Json(Envelope::collection(tasks))))
}

/// `GET /tasks/{id}`
pub async fn get_task<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let task = store.get(id).await?;
    Ok((StatusCode::OK, Json(Envelope::data(task))))
}

/// `PUT /tasks/{id}`
pub async fn update_task<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let Json(patch) = payload?;
    let task = store.update(id, patch).await?;
    Ok((StatusCode::OK, Json(Envelope::data(task))))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let removed = store.delete(id).await?;
    let body = Envelope::data(removed).with_message("Task deleted successfully");
    Ok((StatusCode::OK, Json(body)))
}

/// `GET /tasks/{id}/logs`
///
/// Entries survive deletion of the task they reference.
pub async fn list_task_logs<R, L, C>(
    State(store): State<SharedTaskStore<R, L, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Vec<ActivityLogEntry>>
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let entries = store.recorder().list_for_task(id).await?;
    Ok((StatusCode::OK, Json(Envelope::collection(entries))))
}
