//! Connection and session management.
//!
//! `Db` is the explicitly constructed persistence handle: built once from
//! a [`DatabaseConfig`], cloned into whatever state needs it, and closed
//! on shutdown. There is no process-wide engine or session factory.
//!
//! Each unit of work is either a pooled connection from [`Db::acquire`]
//! (released on drop, on every exit path) or a transaction from
//! [`Db::begin`], across which multiple entity writes commit or roll back
//! together. A transaction dropped without an explicit commit rolls back.

mod error;
mod pool;
pub mod repos;
pub mod schema;

use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, Transaction};

use crate::config::{BackendKind, DatabaseConfig};

pub use error::{DbError, IntegrityKind};

pub type DbResult<T> = Result<T, DbError>;

/// Handle to the storage backend.
#[derive(Clone)]
pub struct Db {
    pool: AnyPool,
    backend: BackendKind,
}

impl Db {
    /// Connect and verify the backend is reachable.
    ///
    /// Misconfiguration and unreachable backends surface here rather than
    /// on first use.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let backend = config.backend()?;
        let pool = pool::create_pool(&config.url, backend, config.max_connections)
            .await
            .map_err(DbError::Connectivity)?;

        // Fail fast: a lazily created pool would defer a bad address or
        // bad credentials to the first request.
        pool.acquire().await.map_err(DbError::Connectivity)?;

        tracing::info!(backend = %backend, "database connected");
        Ok(Self { pool, backend })
    }

    /// Check out a connection for a unit of work.
    ///
    /// Dropping the connection returns it to the pool, so release is
    /// guaranteed on every exit path.
    pub async fn acquire(&self) -> DbResult<PoolConnection<Any>> {
        self.pool.acquire().await.map_err(DbError::Connectivity)
    }

    /// Start a transaction: the unit across which multiple writes are
    /// atomic. Dropping it without `commit()` rolls everything back.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Any>> {
        self.pool.begin().await.map_err(DbError::Connectivity)
    }

    /// Round-trip to the backend. Used by health checks to prove the
    /// store is reachable, not just that the process is up.
    pub async fn ping(&self) -> DbResult<()> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// True when the active backend is the file-backed store.
    pub fn is_sqlite(&self) -> bool {
        self.backend.is_sqlite()
    }

    /// True when the active backend is the client/server store.
    pub fn is_postgres(&self) -> bool {
        self.backend.is_postgres()
    }

    /// Close all pooled connections. Call on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
