//! User repository. Username and email are enforced unique by the
//! schema; duplicates surface as integrity violations.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{NewUser, Paginated, Pagination, User, UserUpdate};

use super::{format_ts, parse_ts};

const COLUMNS: &str = "id, username, email, created_at, updated_at";

fn map_row(row: &AnyRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn create(conn: &mut AnyConnection, new: NewUser) -> DbResult<User> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO users (username, email, created_at, updated_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, username, email, created_at, updated_at",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<User> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "user",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(conn: &mut AnyConnection, page: Pagination) -> DbResult<Paginated<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS}, COUNT(*) OVER () AS total
         FROM users
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

pub async fn update(conn: &mut AnyConnection, id: i64, update: UserUpdate) -> DbResult<User> {
    let current = get(&mut *conn, id).await?;
    let username = update.username.unwrap_or(current.username);
    let email = update.email.unwrap_or(current.email);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE users SET username = $1, email = $2, updated_at = $3
         WHERE id = $4
         RETURNING id, username, email, created_at, updated_at",
    )
    .bind(&username)
    .bind(&email)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "user",
            id,
        });
    }
    Ok(())
}
