//! User endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use agentctl_core::db::repos::users;
use agentctl_core::model::{NewUser, Paginated, Pagination, PaginationParams, User, UserUpdate};

use crate::error::ApiError;
use crate::routes::map_page;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

/// GET /users - list users with pagination
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let page = users::list(&mut conn, Pagination::from(params)).await?;
    Ok(Json(map_page(page)))
}

/// POST /users - create a user; username and email must be unique
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    new.validate()?;
    let mut conn = state.db.acquire().await?;
    let user = users::create(&mut conn, new).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let user = users::get(&mut conn, id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/{id} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    update.validate()?;
    let mut conn = state.db.acquire().await?;
    let user = users::update(&mut conn, id, update).await?;
    Ok(Json(user.into()))
}

/// DELETE /users/{id} - also removes agents linked to this user
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    users::delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
