//! Welcome and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service banner
async fn welcome() -> Json<Value> {
    Json(json!({
        "service": "agentctl",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "company/agent/task management API"
    }))
}

/// GET /health - liveness plus a backend round-trip
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.db.ping().await?;
    Ok(Json(json!({
        "status": "ok",
        "backend": state.db.backend().as_str()
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
}
