//! Task execution repository. Executions are created against an existing
//! task and never updated afterwards (the row's `updated_at` exists for
//! schema uniformity but only moves on insert).

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{NewTaskExecution, Paginated, Pagination, TaskExecution};

use super::{format_ts, parse_ts};

fn map_row(row: &AnyRow) -> Result<TaskExecution, sqlx::Error> {
    let result: Option<String> = row.try_get("result")?;
    Ok(TaskExecution {
        id: row.try_get("id")?,
        task_id: row.try_get("task_id")?,
        executed_at: parse_ts(&row.try_get::<String, _>("executed_at")?)?,
        result: result
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

async fn task_exists(conn: &mut AnyConnection, task_id: i64) -> DbResult<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_one(&mut *conn)
        .await?;
    let n: i64 = row.try_get("n").map_err(DbError::from)?;
    Ok(n > 0)
}

/// Record an execution for `task_id`. The task is referenced by id, so a
/// missing task is reported as not-found rather than as a foreign-key
/// violation.
pub async fn create(
    conn: &mut AnyConnection,
    task_id: i64,
    new: NewTaskExecution,
) -> DbResult<TaskExecution> {
    if !task_exists(&mut *conn, task_id).await? {
        return Err(DbError::NotFound {
            resource: "task",
            id: task_id,
        });
    }

    let executed_at = format_ts(new.executed_at.unwrap_or_else(Utc::now));
    let result_json = new
        .result
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DbError::Backend(sqlx::Error::Encode(Box::new(e))))?;
    let now = format_ts(Utc::now());

    let row = sqlx::query(
        "INSERT INTO task_executions (task_id, executed_at, result, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, task_id, executed_at, result, created_at, updated_at",
    )
    .bind(task_id)
    .bind(&executed_at)
    .bind(&result_json)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<TaskExecution> {
    let row = sqlx::query(
        "SELECT id, task_id, executed_at, result, created_at, updated_at
         FROM task_executions
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(DbError::NotFound {
        resource: "task execution",
        id,
    })?;

    Ok(map_row(&row)?)
}

/// Executions for one task, most recent first.
pub async fn list_for_task(
    conn: &mut AnyConnection,
    task_id: i64,
    page: Pagination,
) -> DbResult<Paginated<TaskExecution>> {
    if !task_exists(&mut *conn, task_id).await? {
        return Err(DbError::NotFound {
            resource: "task",
            id: task_id,
        });
    }

    let rows = sqlx::query(
        "SELECT id, task_id, executed_at, result, created_at, updated_at,
                COUNT(*) OVER () AS total
         FROM task_executions
         WHERE task_id = $1
         ORDER BY executed_at DESC, id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(task_id)
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
