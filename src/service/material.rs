//! Material CRUD against PostgreSQL.

use crate::error::{self, AppError};
use crate::model::Material;
use sqlx::PgPool;

const COLUMNS: &str = "id, name, stock_quantity, created_at, updated_at";

pub struct MaterialService;

impl MaterialService {
    pub async fn create(pool: &PgPool, name: &str, stock_quantity: f64) -> Result<Material, AppError> {
        let sql = format!(
            "INSERT INTO materials (name, stock_quantity) VALUES ($1, $2) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, "create material");
        let material = sqlx::query_as::<_, Material>(&sql)
            .bind(name)
            .bind(stock_quantity)
            .fetch_one(pool)
            .await?;
        Ok(material)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Material>, AppError> {
        let sql = format!("SELECT {} FROM materials ORDER BY id", COLUMNS);
        let materials = sqlx::query_as::<_, Material>(&sql).fetch_all(pool).await?;
        Ok(materials)
    }

    /// Fetch one material by id. `None` maps to NotFound at the handler.
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Material>, AppError> {
        let sql = format!("SELECT {} FROM materials WHERE id = $1", COLUMNS);
        let material = sqlx::query_as::<_, Material>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(material)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: &str,
        stock_quantity: f64,
    ) -> Result<Option<Material>, AppError> {
        let sql = format!(
            "UPDATE materials SET name = $2, stock_quantity = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, "update material");
        let material = sqlx::query_as::<_, Material>(&sql)
            .bind(id)
            .bind(name)
            .bind(stock_quantity)
            .fetch_optional(pool)
            .await?;
        Ok(material)
    }

    /// Delete one material. Returns the deleted row, or `None` for an absent
    /// id. A material still referenced by a product composition is blocked by
    /// the RESTRICT foreign key and surfaces as a conflict.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Material>, AppError> {
        let sql = format!("DELETE FROM materials WHERE id = $1 RETURNING {}", COLUMNS);
        tracing::debug!(sql = %sql, id, "delete material");
        let material = sqlx::query_as::<_, Material>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                if error::is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("material {} is referenced by a product", id))
                } else {
                    AppError::Db(e)
                }
            })?;
        Ok(material)
    }
}
