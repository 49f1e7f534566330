//! Task endpoints: CRUD plus execution records.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use agentctl_core::db::repos::tasks::TaskFilter;
use agentctl_core::db::repos::{executions, tasks};
use agentctl_core::model::{
    NewTask, NewTaskExecution, Paginated, Pagination, PaginationParams, Task, TaskExecution,
    TaskPriority, TaskStatus, TaskUpdate,
};

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub agent_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            priority: t.priority,
            status: t.status,
            agent_id: t.agent_id,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct TaskExecutionResponse {
    pub id: i64,
    pub task_id: i64,
    pub executed_at: String,
    pub result: Option<Value>,
    pub created_at: String,
}

impl From<TaskExecution> for TaskExecutionResponse {
    fn from(e: TaskExecution) -> Self {
        Self {
            id: e.id,
            task_id: e.task_id,
            executed_at: e.executed_at.to_rfc3339(),
            result: e.result,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TaskListParams {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    agent_id: Option<i64>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /tasks - list, filterable by status, priority, and agent
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<Paginated<TaskResponse>>, ApiError> {
    let filter = TaskFilter {
        status: params.status,
        priority: params.priority,
        agent_id: params.agent_id,
    };
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = tasks::list(&mut conn, filter, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /tasks
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let task = tasks::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /tasks/{id}
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let task = tasks::get(&mut conn, id).await?;
    Ok(Json(task.into()))
}

/// PUT /tasks/{id} - partial update
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<TaskResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let task = tasks::update(&mut conn, id, update).await?;
    Ok(Json(task.into()))
}

/// DELETE /tasks/{id} - cascades to execution records
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    tasks::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
struct ExecutionListParams {
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /tasks/{id}/executions - execution history, most recent first
async fn list_executions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<ExecutionListParams>,
) -> Result<Json<Paginated<TaskExecutionResponse>>, ApiError> {
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = executions::list_for_task(&mut conn, id, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /tasks/{id}/executions - record an execution
async fn create_execution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(new): Json<NewTaskExecution>,
) -> Result<(StatusCode, Json<TaskExecutionResponse>), ApiError> {
    let mut conn = state.db.acquire().await?;
    let execution = executions::create(&mut conn, id, new).await?;
    Ok((StatusCode::CREATED, Json(execution.into())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/tasks/{id}/executions",
            get(list_executions).post(create_execution),
        )
}
