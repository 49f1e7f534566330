//! Connection pool creation.

use std::sync::Once;

use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Executor};

use crate::config::BackendKind;

static DRIVERS: Once = Once::new();

/// Build the pool for the configured backend.
///
/// SQLite does not enforce foreign keys unless asked per connection, and
/// cascade deletes depend on them, so every checked-out SQLite connection
/// gets the pragma applied first.
pub(crate) async fn create_pool(
    url: &str,
    backend: BackendKind,
    max_connections: u32,
) -> Result<AnyPool, sqlx::Error> {
    DRIVERS.call_once(sqlx::any::install_default_drivers);

    let mut options = AnyPoolOptions::new().max_connections(max_connections);

    if backend.is_sqlite() {
        options = options.after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                Ok(())
            })
        });
    }

    options.connect(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn sqlite_connections_enforce_foreign_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}/pool.db?mode=rwc", dir.path().display());

        let pool = create_pool(&url, BackendKind::Sqlite, 2)
            .await
            .expect("pool creation should succeed");

        let row = sqlx::query("PRAGMA foreign_keys;")
            .fetch_one(&pool)
            .await
            .expect("pragma query");
        let enabled: i64 = row.try_get(0).expect("pragma value");
        assert_eq!(enabled, 1, "foreign keys should be enabled");
    }
}
