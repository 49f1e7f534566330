//! Task repository.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{NewTask, Paginated, Pagination, Task, TaskPriority, TaskStatus, TaskUpdate};

use super::{format_ts, parse_ts};

const COLUMNS: &str =
    "id, title, description, priority, status, agent_id, created_at, updated_at";

/// Optional filters for [`list`]. Empty filter lists everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub agent_id: Option<i64>,
}

fn map_row(row: &AnyRow) -> Result<Task, sqlx::Error> {
    let priority: String = row.try_get("priority")?;
    let status: String = row.try_get("status")?;
    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority: priority
            .parse::<TaskPriority>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        status: status
            .parse::<TaskStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        agent_id: row.try_get("agent_id")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

/// Insert a task. A dangling `agent_id` is rejected by the foreign key
/// as an integrity violation.
pub async fn create(conn: &mut AnyConnection, new: NewTask) -> DbResult<Task> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO tasks (title, description, priority, status, agent_id,
                            created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, title, description, priority, status, agent_id,
                   created_at, updated_at",
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.priority.as_str())
    .bind(new.status.as_str())
    .bind(new.agent_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<Task> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "task",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(
    conn: &mut AnyConnection,
    filter: TaskFilter,
    page: Pagination,
) -> DbResult<Paginated<Task>> {
    let mut sql = format!("SELECT {COLUMNS}, COUNT(*) OVER () AS total FROM tasks");
    let mut conditions = Vec::new();
    let mut arg = 0usize;

    // Status and priority together hit the composite index.
    if filter.status.is_some() {
        arg += 1;
        conditions.push(format!("status = ${arg}"));
    }
    if filter.priority.is_some() {
        arg += 1;
        conditions.push(format!("priority = ${arg}"));
    }
    if filter.agent_id.is_some() {
        arg += 1;
        conditions.push(format!("agent_id = ${arg}"));
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(&format!(
        " ORDER BY id LIMIT ${} OFFSET ${}",
        arg + 1,
        arg + 2
    ));

    let mut query = sqlx::query(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        query = query.bind(priority.as_str());
    }
    if let Some(agent_id) = filter.agent_id {
        query = query.bind(agent_id);
    }
    let rows = query
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

pub async fn update(conn: &mut AnyConnection, id: i64, update: TaskUpdate) -> DbResult<Task> {
    let current = get(&mut *conn, id).await?;
    let title = update.title.unwrap_or(current.title);
    let description = update.description.or(current.description);
    let priority = update.priority.unwrap_or(current.priority);
    let status = update.status.unwrap_or(current.status);
    let agent_id = update.agent_id.or(current.agent_id);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, priority = $3, status = $4,
                          agent_id = $5, updated_at = $6
         WHERE id = $7
         RETURNING id, title, description, priority, status, agent_id,
                   created_at, updated_at",
    )
    .bind(&title)
    .bind(&description)
    .bind(priority.as_str())
    .bind(status.as_str())
    .bind(agent_id)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "task",
            id,
        });
    }
    Ok(())
}
