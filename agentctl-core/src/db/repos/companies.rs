//! Company repository.

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::AnyConnection;
use sqlx::Row;

use crate::db::{DbError, DbResult};
use crate::model::{Company, CompanyUpdate, NewCompany, Paginated, Pagination};

use super::{format_ts, parse_ts};

const COLUMNS: &str = "id, name, description, holding_id, created_at, updated_at";

fn map_row(row: &AnyRow) -> Result<Company, sqlx::Error> {
    Ok(Company {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        holding_id: row.try_get("holding_id")?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

/// Insert a company. A dangling `holding_id` is rejected by the foreign
/// key as an integrity violation.
pub async fn create(conn: &mut AnyConnection, new: NewCompany) -> DbResult<Company> {
    let now = format_ts(Utc::now());
    let row = sqlx::query(
        "INSERT INTO companies (name, description, holding_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, description, holding_id, created_at, updated_at",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.holding_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn get(conn: &mut AnyConnection, id: i64) -> DbResult<Company> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM companies WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound {
            resource: "company",
            id,
        })?;

    Ok(map_row(&row)?)
}

pub async fn list(
    conn: &mut AnyConnection,
    holding_id: Option<i64>,
    page: Pagination,
) -> DbResult<Paginated<Company>> {
    let query = match holding_id {
        Some(holding_id) => sqlx::query(
            "SELECT id, name, description, holding_id, created_at, updated_at,
                    COUNT(*) OVER () AS total
             FROM companies
             WHERE holding_id = $1
             ORDER BY id
             LIMIT $2 OFFSET $3",
        )
        .bind(holding_id),
        None => sqlx::query(
            "SELECT id, name, description, holding_id, created_at, updated_at,
                    COUNT(*) OVER () AS total
             FROM companies
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

pub async fn update(conn: &mut AnyConnection, id: i64, update: CompanyUpdate) -> DbResult<Company> {
    let current = get(&mut *conn, id).await?;
    let name = update.name.unwrap_or(current.name);
    let description = update.description.or(current.description);
    let holding_id = update.holding_id.unwrap_or(current.holding_id);
    let updated_at = format_ts(Utc::now());

    let row = sqlx::query(
        "UPDATE companies SET name = $1, description = $2, holding_id = $3, updated_at = $4
         WHERE id = $5
         RETURNING id, name, description, holding_id, created_at, updated_at",
    )
    .bind(&name)
    .bind(&description)
    .bind(holding_id)
    .bind(&updated_at)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn delete(conn: &mut AnyConnection, id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            resource: "company",
            id,
        });
    }
    Ok(())
}
