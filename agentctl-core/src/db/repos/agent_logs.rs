//! Agent log repository. Append-only: rows are inserted and listed,
//! never updated.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{AgentLog, NewAgentLog, Paginated, Pagination};

use super::{format_ts, parse_ts};

fn map_row(row: &AnyRow) -> Result<AgentLog, sqlx::Error> {
    Ok(AgentLog {
        id: row.try_get("id")?,
        agent_id: row.try_get("agent_id")?,
        log_message: row.try_get("log_message")?,
        log_time: parse_ts(&row.try_get::<String, _>("log_time")?)?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
    })
}

async fn agent_exists(conn: &mut AnyConnection, agent_id: i64) -> DbResult<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM agents WHERE id = $1")
        .bind(agent_id)
        .fetch_one(&mut *conn)
        .await?;
    let n: i64 = row.try_get("n").map_err(DbError::from)?;
    Ok(n > 0)
}

/// Append a log entry for `agent_id`. The agent is referenced by id, so
/// a missing agent is reported as not-found rather than as a foreign-key
/// violation.
pub async fn create(
    conn: &mut AnyConnection,
    agent_id: i64,
    new: NewAgentLog,
) -> DbResult<AgentLog> {
    if !agent_exists(&mut *conn, agent_id).await? {
        return Err(DbError::NotFound {
            resource: "agent",
            id: agent_id,
        });
    }

    let log_time = format_ts(new.log_time.unwrap_or_else(Utc::now));
    let now = format_ts(Utc::now());

    let row = sqlx::query(
        "INSERT INTO agent_logs (agent_id, log_message, log_time, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, agent_id, log_message, log_time, created_at",
    )
    .bind(agent_id)
    .bind(&new.log_message)
    .bind(&log_time)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

/// Log entries for one agent, most recent first.
pub async fn list_for_agent(
    conn: &mut AnyConnection,
    agent_id: i64,
    page: Pagination,
) -> DbResult<Paginated<AgentLog>> {
    if !agent_exists(&mut *conn, agent_id).await? {
        return Err(DbError::NotFound {
            resource: "agent",
            id: agent_id,
        });
    }

    let rows = sqlx::query(
        "SELECT id, agent_id, log_message, log_time, created_at,
                COUNT(*) OVER () AS total
         FROM agent_logs
         WHERE agent_id = $1
         ORDER BY log_time DESC, id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(agent_id)
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
