//! Company endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use agentctl_core::db::repos::companies;
use agentctl_core::model::{
    Company, CompanyUpdate, NewCompany, Paginated, Pagination, PaginationParams,
};

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub holding_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            holding_id: c.holding_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CompanyListParams {
    holding_id: Option<i64>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET /companies - list, optionally scoped to one holding
async fn list_companies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompanyListParams>,
) -> Result<Json<Paginated<CompanyResponse>>, ApiError> {
    let page = Pagination::from(PaginationParams {
        page: params.page,
        per_page: params.per_page,
    });
    let mut conn = state.db.acquire().await?;
    let result = companies::list(&mut conn, params.holding_id, page).await?;
    Ok(Json(map_page(result)))
}

/// POST /companies - create a company under a holding
async fn create_company(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewCompany>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let company = companies::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

/// GET /companies/{id}
async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let company = companies::get(&mut conn, id).await?;
    Ok(Json(company.into()))
}

/// PUT /companies/{id} - partial update
async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<CompanyUpdate>,
) -> Result<Json<CompanyResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let company = companies::update(&mut conn, id, update).await?;
    Ok(Json(company.into()))
}

/// DELETE /companies/{id}
async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    companies::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
}
