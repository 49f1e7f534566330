//! Holding endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use agentctl_core::db::repos::holdings;
use agentctl_core::model::{
    Holding, HoldingUpdate, NewHolding, Paginated, Pagination, PaginationParams,
};

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HoldingResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Holding> for HoldingResponse {
    fn from(h: Holding) -> Self {
        Self {
            id: h.id,
            name: h.name,
            description: h.description,
            created_at: h.created_at.to_rfc3339(),
            updated_at: h.updated_at.to_rfc3339(),
        }
    }
}

/// GET /holdings - list holdings with pagination
async fn list_holdings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<HoldingResponse>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let page = holdings::list(&mut conn, Pagination::from(params)).await?;
    Ok(Json(map_page(page)))
}

/// POST /holdings - create a holding
async fn create_holding(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewHolding>,
) -> Result<(StatusCode, Json<HoldingResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let holding = holdings::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(holding.into())))
}

/// GET /holdings/{id} - fetch one holding
async fn get_holding(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<HoldingResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let holding = holdings::get(&mut conn, id).await?;
    Ok(Json(holding.into()))
}

/// PUT /holdings/{id} - partial update
async fn update_holding(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<HoldingUpdate>,
) -> Result<Json<HoldingResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let holding = holdings::update(&mut conn, id, update).await?;
    Ok(Json(holding.into()))
}

/// DELETE /holdings/{id} - delete, cascading to the whole subtree
async fn delete_holding(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    holdings::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(list_holdings).post(create_holding))
        .route(
            "/holdings/{id}",
            get(get_holding).put(update_holding).delete(delete_holding),
        )
}
