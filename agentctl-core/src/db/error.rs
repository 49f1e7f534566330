//! Persistence error taxonomy.
//!
//! Three conditions callers must tell apart: integrity violations
//! (rejected writes, nothing persisted), connectivity failures (fatal to
//! the in-flight request), and not-found lookups. Everything else is a
//! generic backend error. Nothing is retried or swallowed here; every
//! failure aborts the enclosing unit of work and propagates.

use std::fmt;

use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::config::ConfigError;

/// Which constraint a rejected write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
            Self::NotNull => "not null",
        };
        f.write_str(s)
    }
}

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A write violated a uniqueness, foreign-key, check, or not-null
    /// constraint. No partial write occurred.
    #[error("integrity violation ({kind} constraint): {detail}")]
    Integrity {
        kind: IntegrityKind,
        detail: String,
    },

    /// The referenced row does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// The configured backend is unreachable or the pool is exhausted.
    #[error("database unavailable: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// The connection string itself is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Any other driver-level failure.
    #[error("database error: {0}")]
    Backend(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let kind = match db.kind() {
                    ErrorKind::UniqueViolation => Some(IntegrityKind::Unique),
                    ErrorKind::ForeignKeyViolation => Some(IntegrityKind::ForeignKey),
                    ErrorKind::CheckViolation => Some(IntegrityKind::Check),
                    ErrorKind::NotNullViolation => Some(IntegrityKind::NotNull),
                    _ => None,
                };
                match kind {
                    Some(kind) => DbError::Integrity {
                        kind,
                        detail: db.message().to_owned(),
                    },
                    None => DbError::Backend(sqlx::Error::Database(db)),
                }
            }
            e @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)) => DbError::Connectivity(e),
            e => DbError::Backend(e),
        }
    }
}

impl DbError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource() {
        let err = DbError::NotFound {
            resource: "holding",
            id: 42,
        };
        assert_eq!(err.to_string(), "holding 42 not found");
        assert!(err.is_not_found());
        assert!(!err.is_integrity());
    }

    #[test]
    fn pool_timeout_maps_to_connectivity() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Connectivity(_)));
    }
}
