//! API error type with automatic HTTP status mapping.
//!
//! The persistence taxonomy maps onto status codes: validation 400,
//! not-found 404, integrity 409, connectivity 503, everything else 500.
//! Internal detail is logged, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use agentctl_core::model::ValidationError;
use agentctl_core::DbError;

#[derive(Debug)]
pub enum ApiError {
    /// Request payload failed field validation (400).
    Validation(ValidationError),

    /// Referenced row does not exist (404).
    NotFound { resource: &'static str, id: i64 },

    /// Write rejected by an integrity constraint (409).
    Conflict { detail: String },

    /// Storage backend unreachable (503, logged).
    Unavailable(DbError),

    /// Any other persistence failure (500, logged).
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} {} not found", resource, id)
                }),
            ),
            Self::Conflict { detail } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": detail
                }),
            ),
            Self::Unavailable(e) => {
                tracing::error!("database unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "unavailable",
                        "message": "storage backend unavailable"
                    }),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return a generic message.
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Integrity { kind, detail } => {
                tracing::warn!(%kind, %detail, "write rejected by integrity constraint");
                Self::Conflict {
                    detail: format!("{kind} constraint violated"),
                }
            }
            e @ (DbError::Connectivity(_) | DbError::Config(_)) => Self::Unavailable(e),
            e => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(DbError::NotFound {
            resource: "holding",
            id: 7,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn integrity_violation_is_409() {
        let err = ApiError::from(DbError::Integrity {
            kind: agentctl_core::IntegrityKind::Unique,
            detail: "UNIQUE constraint failed: holdings.name".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn bad_configuration_is_503() {
        let err = ApiError::from(DbError::Config(
            agentctl_core::ConfigError::UnsupportedScheme {
                url: "mysql://nope".into(),
            },
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
