//! Schema DDL and database bootstrap.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Table DDL in dependency order: the join table references both entity
/// tables. Deleting a product cascades to its composition rows; deleting a
/// material that a composition still references is blocked (RESTRICT) and
/// surfaces as a conflict.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS materials (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        stock_quantity DOUBLE PRECISION NOT NULL CHECK (stock_quantity >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        value DOUBLE PRECISION NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_materials (
        product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        material_id BIGINT NOT NULL REFERENCES materials(id) ON DELETE RESTRICT,
        quantity DOUBLE PRECISION NOT NULL,
        PRIMARY KEY (product_id, material_id)
    )
    "#,
];

/// Create the three tables if absent. Idempotent; call before serving.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_is_last_path_segment() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost:5432/inventory").unwrap();
        assert_eq!(admin, "postgres://localhost:5432/postgres");
        assert_eq!(name, "inventory");
    }

    #[test]
    fn query_string_is_stripped_from_db_name() {
        let (_, name) = parse_db_name_from_url("postgres://u:p@db/inventory?sslmode=disable").unwrap();
        assert_eq!(name, "inventory");
    }

    #[test]
    fn join_table_constraints_match_delete_policy() {
        let join = SCHEMA[2];
        assert!(join.contains("REFERENCES products(id) ON DELETE CASCADE"));
        assert!(join.contains("REFERENCES materials(id) ON DELETE RESTRICT"));
        assert!(join.contains("PRIMARY KEY (product_id, material_id)"));
    }
}
