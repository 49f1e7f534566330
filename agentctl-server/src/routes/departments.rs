//! Department endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use agentctl_core::db::repos::departments;
use agentctl_core::model::{
    Department, DepartmentUpdate, NewDepartment, Paginated, Pagination, PaginationParams,
};

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub company_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Department> for DepartmentResponse {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            company_id: d.company_id,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DepartmentListParams {
    company_id: Option<i64>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /departments - list, optionally scoped to one company
async fn list_departments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DepartmentListParams>,
) -> Result<Json<Paginated<DepartmentResponse>>, ApiError> {
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = departments::list(&mut conn, params.company_id, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /departments
async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewDepartment>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let department = departments::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// GET /departments/{id}
async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let department = departments::get(&mut conn, id).await?;
    Ok(Json(department.into()))
}

/// PUT /departments/{id} - partial update
async fn update_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<DepartmentUpdate>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let department = departments::update(&mut conn, id, update).await?;
    Ok(Json(department.into()))
}

/// DELETE /departments/{id}
async fn delete_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    departments::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}
