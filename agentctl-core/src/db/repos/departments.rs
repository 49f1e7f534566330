//! Department repository.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{Department, DepartmentUpdate, NewDepartment, Paginated, Pagination};

use super::{format_ts, parse_ts};

const COLUMNS: &str = "id, name, description, company_id, created_at, updated_at";

fn map_row(row: &AnyRow) -> Result<Department, sqlx::Error> {
    Ok(Department {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        company_id: row.try_get("company_id")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn create(conn: &mut AnyConnection, new: NewDepartment) -> DbResult<Department> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO departments (name, description, company_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, description, company_id, created_at, updated_at",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.company_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<Department> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM departments WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "department",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(
    conn: &mut AnyConnection,
    company_id: Option<i64>,
    page: Pagination,
) -> DbResult<Paginated<Department>> {
    let query = match company_id {
        Some(company_id) => sqlx::query(
            "SELECT id, name, description, company_id, created_at, updated_at,
                    COUNT(*) OVER () AS total
             FROM departments
             WHERE company_id = $1
             ORDER BY id
             LIMIT $2 OFFSET $3",
        )
        .bind(company_id),
        None => sqlx::query(
            "SELECT id, name, description, company_id, created_at, updated_at,
                    COUNT(*) OVER () AS total
             FROM departments
             ORDER BY id
             LIMIT $1 OFFSET $2",
        ),
    };

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

pub async fn update(
    conn: &mut AnyConnection,
    id: i64,
    update: DepartmentUpdate,
) -> DbResult<Department> {
    let current = get(&mut *conn, id).await?;
    let name = update.name.unwrap_or(current.name);
    let description = update.description.or(current.description);
    let company_id = update.company_id.unwrap_or(current.company_id);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE departments SET name = $1, description = $2, company_id = $3, updated_at = $4
         WHERE id = $5
         RETURNING id, name, description, company_id, created_at, updated_at",
    )
    .bind(&name)
    .bind(&description)
    .bind(company_id)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM departments WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "department",
            id,
        });
    }
    Ok(())
}
