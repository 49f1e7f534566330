//! Holding repository.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{Holding, HoldingUpdate, NewHolding, Paginated, Pagination};

use super::{format_ts, parse_ts};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

fn map_row(row: &AnyRow) -> Result<Holding, sqlx::Error> {
    Ok(Holding {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn create(conn: &mut AnyConnection, new: NewHolding) -> DbResult<Holding> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO holdings (name, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, description, created_at, updated_at",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<Holding> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM holdings WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "holding",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(conn: &mut AnyConnection, page: Pagination) -> DbResult<Paginated<Holding>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS}, COUNT(*) OVER () AS total
         FROM holdings
         ORDER BY id
         LIMIT $1 OFFSET $2"
    ))
    .bind(i64::from(page.limit()))
    .bind(page.offset() as i64)
    .fetch_all(&mut *conn)
    .await?;

    let total = match rows.first() {
        Some(row) => row.try_get::<i64, _>("total").map_err(DbError::from)?,
        None => 0,
    };
    let items = rows
        .iter()
        .map(map_row)
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    Ok(Paginated {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    })
}

/// Partial update. Always refreshes `updated_at`; `created_at` is never
/// touched.
pub async fn update(conn: &mut AnyConnection, id: i64, update: HoldingUpdate) -> DbResult<Holding> {
    let current = get(&mut *conn, id).await?;
    let name = update.name.unwrap_or(current.name);
    let description = update.description.or(current.description);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE holdings SET name = $1, description = $2, updated_at = $3
         WHERE id = $4
         RETURNING id, name, description, created_at, updated_at",
    )
    .bind(&name)
    .bind(&description)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

/// Delete a holding. Cascades to every descendant company, department,
/// agent, task, execution, and log.
pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM holdings WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "holding",
            id,
        });
    }
    Ok(())
}
