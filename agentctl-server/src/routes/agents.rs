//! Agent endpoints: CRUD, activity logs, and the run pass-through.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use agentctl_core::db::repos::agents::AgentFilter;
use agentctl_core::db::repos::{agent_logs, agents, executions, tasks};
use agentctl_core::model::{
    Agent, AgentLog, AgentStatus, AgentUpdate, NewAgent, NewAgentLog, NewTaskExecution, Paginated,
    Pagination, PaginationParams, TaskStatus, TaskUpdate,
};
use agentctl_core::DbError;

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AgentResponse {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub status: AgentStatus,
    pub user_id: Option<i64>,
    pub department_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Agent> for AgentResponse {
    fn from(a: Agent) -> Self {
        Self {
            id: a.id,
            name: a.name,
            role: a.role,
            description: a.description,
            status: a.status,
            user_id: a.user_id,
            department_id: a.department_id,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct AgentLogResponse {
    pub id: i64,
    pub agent_id: i64,
    pub log_message: String,
    pub log_time: String,
    pub created_at: String,
}

impl From<AgentLog> for AgentLogResponse {
    fn from(l: AgentLog) -> Self {
        Self {
            id: l.id,
            agent_id: l.agent_id,
            log_message: l.log_message,
            log_time: l.log_time.to_rfc3339(),
            created_at: l.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AgentListParams {
    status: Option<AgentStatus>,
    department_id: Option<i64>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /agents - list, filterable by status and department
async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgentListParams>,
) -> Result<Json<Paginated<AgentResponse>>, ApiError> {
    let filter = AgentFilter {
        status: params.status,
        department_id: params.department_id,
    };
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = agents::list(&mut conn, filter, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /agents
async fn create_agent(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewAgent>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let agent = agents::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(agent.into())))
}

/// GET /agents/{id}
async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AgentResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let agent = agents::get(&mut conn, id).await?;
    Ok(Json(agent.into()))
}

/// PUT /agents/{id} - partial update
async fn update_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<AgentUpdate>,
) -> Result<Json<AgentResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let agent = agents::update(&mut conn, id, update).await?;
    Ok(Json(agent.into()))
}

/// DELETE /agents/{id} - cascades to tasks, executions, and logs
async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    agents::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
struct LogListParams {
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /agents/{id}/logs - activity log, most recent first
async fn list_agent_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<LogListParams>,
) -> Result<Json<Paginated<AgentLogResponse>>, ApiError> {
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = agent_logs::list_for_agent(&mut conn, id, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /agents/{id}/logs - append a log entry
async fn create_agent_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(new): Json<NewAgentLog>,
) -> Result<(StatusCode, Json<AgentLogResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let log = agent_logs::create(&mut conn, id, new).await?;
    Ok((StatusCode::CREATED, Json(log.into())))
}

#[derive(Debug, Deserialize)]
struct RunAgentRequest {
    /// Task to execute; when present, a TaskExecution is recorded and the
    /// task is marked completed.
    task_id: Option<i64>,
    /// Free-form run subject when no task is given.
    input: Option<String>,
}

#[derive(Serialize)]
struct RunAgentResponse {
    agent_id: i64,
    result: String,
    log_id: i64,
    execution_id: Option<i64>,
    task_status: Option<TaskStatus>,
}

/// POST /agents/{id}/run - execute an agent.
///
/// All writes (log entry, execution record, task status change) happen in
/// one unit of work: either everything commits or nothing does.
async fn run_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<RunAgentRequest>,
) -> Result<Json<RunAgentResponse>, ApiError> {
    let mut tx = state.db.begin().await?;

    let agent = agents::get(&mut tx, id).await?;
    if agent.status != AgentStatus::Active {
        return Err(ApiError::Conflict {
            detail: format!("agent {} is {}, not active", agent.id, agent.status),
        });
    }

    let task = match req.task_id {
        Some(task_id) => Some(tasks::get(&mut tx, task_id).await?),
        None => None,
    };
    let subject = task
        .as_ref()
        .map(|t| t.title.clone())
        .or(req.input)
        .unwrap_or_else(|| "ad hoc run".to_owned());
    let result = format!("Task completed: {subject}");

    let log = agent_logs::create(
        &mut tx,
        agent.id,
        NewAgentLog {
            log_message: result.clone(),
            log_time: None,
        },
    )
    .await?;

    let mut execution_id = None;
    let mut task_status = None;
    if let Some(task) = task {
        let execution = executions::create(
            &mut tx,
            task.id,
            NewTaskExecution {
                executed_at: None,
                result: Some(json!({
                    "output": result,
                    "agent_id": agent.id,
                })),
            },
        )
        .await?;
        let updated = tasks::update(
            &mut tx,
            task.id,
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..TaskUpdate::default()
            },
        )
        .await?;
        execution_id = Some(execution.id);
        task_status = Some(updated.status);
    }

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(RunAgentResponse {
        agent_id: agent.id,
        result,
        log_id: log.id,
        execution_id,
        task_status,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route(
            "/agents/{id}",
            get(get_agent).put(update_agent).delete(delete_agent),
        )
        .route(
            "/agents/{id}/logs",
            get(list_agent_logs).post(create_agent_log),
        )
        .route("/agents/{id}/run", post(run_agent))
}
