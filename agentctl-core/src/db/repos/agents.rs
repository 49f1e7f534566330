//! Agent repository.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{Agent, AgentStatus, AgentUpdate, NewAgent, Paginated, Pagination};

use super::{format_ts, parse_ts};

const COLUMNS: &str =
    "id, name, role, description, status, user_id, department_id, created_at, updated_at";

/// Optional filters for [`list`]. Empty filter lists everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentFilter {
    pub status: Option<AgentStatus>,
    pub department_id: Option<i64>,
}

fn map_row(row: &AnyRow) -> Result<Agent, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Agent {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        description: row.try_get("description")?,
        status: status
            .parse::<AgentStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        user_id: row.try_get("user_id")?,
        department_id: row.try_get("department_id")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

/// Insert an agent. Dangling `department_id` or `user_id` references are
/// rejected by the foreign keys as integrity violations.
pub async fn create(conn: &mut AnyConnection, new: NewAgent) -> DbResult<Agent> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO agents (name, role, description, status, user_id, department_id,
                             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id, name, role, description, status, user_id, department_id,
                   created_at, updated_at",
    )
    .bind(&new.name)
    .bind(&new.role)
    .bind(&new.description)
    .bind(new.status.as_str())
    .bind(new.user_id)
    .bind(new.department_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<Agent> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM agents WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "agent",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(
    conn: &mut AnyConnection,
    filter: AgentFilter,
    page: Pagination,
) -> DbResult<Paginated<Agent>> {
    let mut sql = format!("SELECT {COLUMNS}, COUNT(*) OVER () AS total FROM agents");
    let mut conditions = Vec::new();
    let mut arg = 0usize;

    if filter.status.is_some() {
        arg += 1;
        conditions.push(format!("status = ${arg}"));
    }
    if filter.department_id.is_some() {
        arg += 1;
        conditions.push(format!("department_id = ${arg}"));
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
    if let Some(department_id) = filter.department_id {
        query = query.bind(department_id);
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

pub async fn update(conn: &mut AnyConnection, id: i64, update: AgentUpdate) -> DbResult<Agent> {
    let current = get(&mut *conn, id).await?;
    let name = update.name.unwrap_or(current.name);
    let role = update.role.unwrap_or(current.role);
    let description = update.description.or(current.description);
    let status = update.status.unwrap_or(current.status);
    let user_id = update.user_id.or(current.user_id);
    let department_id = update.department_id.unwrap_or(current.department_id);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE agents SET name = $1, role = $2, description = $3, status = $4,
                           user_id = $5, department_id = $6, updated_at = $7
         WHERE id = $8
         RETURNING id, name, role, description, status, user_id, department_id,
                   created_at, updated_at",
    )
    .bind(&name)
    .bind(&role)
    .bind(&description)
    .bind(status.as_str())
    .bind(user_id)
    .bind(department_id)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM agents WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "agent",
            id,
        });
    }
    Ok(())
}
