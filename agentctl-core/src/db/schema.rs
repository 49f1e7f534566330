//! Schema lifecycle: initialize, drop-all, reset.
//!
//! Every table mirrors a record in `crate::model`. Timestamps are stored
//! as fixed-width RFC 3339 UTC text (see `repos::format_ts`), enum
//! columns as text constrained by CHECK clauses built from the same enum
//! sets the application validates against, and every parent/child foreign
//! key carries ON DELETE CASCADE so removing a row removes its whole
//! subtree without application-level cleanup.

use crate::config::BackendKind;
use crate::model::{AgentStatus, TaskPriority, TaskStatus};

use super::{Db, DbResult};

/// Table names, parent-first. Drops run in reverse so children go first.
const TABLES: [&str; 8] = [
    "holdings",
    "companies",
    "departments",
    "users",
    "agents",
    "tasks",
    "task_executions",
    "agent_logs",
];

const INDEXES: [&str; 17] = [
    "CREATE INDEX IF NOT EXISTS idx_companies_holding ON companies(holding_id)",
    "CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(name)",
    "CREATE INDEX IF NOT EXISTS idx_departments_company ON departments(company_id)",
    "CREATE INDEX IF NOT EXISTS idx_departments_name ON departments(name)",
    "CREATE INDEX IF NOT EXISTS idx_agents_department ON agents(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_agents_user ON agents(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_agents_status ON agents(status)",
    "CREATE INDEX IF NOT EXISTS idx_agents_name ON agents(name)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_agent ON tasks(agent_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status_priority ON tasks(status, priority)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_title ON tasks(title)",
    "CREATE INDEX IF NOT EXISTS idx_task_executions_task ON task_executions(task_id)",
    "CREATE INDEX IF NOT EXISTS idx_task_executions_executed_at ON task_executions(executed_at)",
    "CREATE INDEX IF NOT EXISTS idx_agent_logs_agent ON agent_logs(agent_id)",
    "CREATE INDEX IF NOT EXISTS idx_agent_logs_time ON agent_logs(log_time)",
];

/// Auto-increment primary key column, per dialect.
fn pk(backend: BackendKind) -> &'static str {
    match backend {
        BackendKind::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        BackendKind::Postgres => "BIGSERIAL PRIMARY KEY",
    }
}

/// `CHECK (column IN ('a', 'b', ...))` from an enum's permitted set.
fn check_in(column: &str, values: impl IntoIterator<Item = &'static str>) -> String {
    let list = values
        .into_iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CHECK ({column} IN ({list}))")
}

fn create_statements(backend: BackendKind) -> Vec<String> {
    let pk = pk(backend);
    let agent_status = check_in("status", AgentStatus::ALL.map(AgentStatus::as_str));
    let task_status = check_in("status", TaskStatus::ALL.map(TaskStatus::as_str));
    let task_priority = check_in("priority", TaskPriority::ALL.map(TaskPriority::as_str));

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS holdings (
                id {pk},
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS companies (
                id {pk},
                name TEXT NOT NULL,
                description TEXT,
                holding_id BIGINT NOT NULL REFERENCES holdings(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS departments (
                id {pk},
                name TEXT NOT NULL,
                description TEXT,
                company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS users (
                id {pk},
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS agents (
                id {pk},
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL {agent_status},
                user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
                department_id BIGINT NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS tasks (
                id {pk},
                title TEXT NOT NULL,
                description TEXT,
                priority TEXT NOT NULL {task_priority},
                status TEXT NOT NULL {task_status},
                agent_id BIGINT REFERENCES agents(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS task_executions (
                id {pk},
                task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                executed_at TEXT NOT NULL,
                result TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS agent_logs (
                id {pk},
                agent_id BIGINT NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
                log_message TEXT NOT NULL,
                log_time TEXT NOT NULL,
                created_at TEXT NOT NULL
            )"
        ),
    ]
}

/// Create all tables and indexes that do not exist yet. Idempotent.
pub async fn init(db: &Db) -> DbResult<()> {
    let mut conn = db.acquire().await?;

    for statement in create_statements(db.backend()) {
        sqlx::query(&statement).execute(&mut *conn).await?;
    }
    for index in INDEXES {
        sqlx::query(index).execute(&mut *conn).await?;
    }

    tracing::info!(backend = %db.backend(), "schema initialized");
    Ok(())
}

/// Drop every table, children first. Destructive; intended for test
/// teardown and development resets.
pub async fn drop_all(db: &Db) -> DbResult<()> {
    let mut conn = db.acquire().await?;

    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *conn)
            .await?;
    }

    tracing::warn!("all tables dropped");
    Ok(())
}

/// drop-all followed by initialize. Destructive.
pub async fn reset(db: &Db) -> DbResult<()> {
    drop_all(db).await?;
    init(db).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_clause_quotes_values() {
        let clause = check_in("status", ["active", "inactive"]);
        assert_eq!(clause, "CHECK (status IN ('active', 'inactive'))");
    }

    #[test]
    fn one_create_statement_per_table() {
        assert_eq!(create_statements(BackendKind::Sqlite).len(), TABLES.len());
        for (statement, table) in create_statements(BackendKind::Postgres)
            .iter()
            .zip(TABLES)
        {
            assert!(statement.contains(table));
        }
    }
}
