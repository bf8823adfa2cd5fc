//! Product CRUD and the composition updater.
//!
//! Composition rows are never updated in place: replacement deletes every row
//! for the product and recreates the list from the request, all inside one
//! transaction. A failure at any step rolls the whole unit back, so a product
//! can never be read with a half-replaced bill of materials.

use crate::error::{self, AppError};
use crate::model::{CompositionLine, Material, MaterialLine, Product, ProductDetail};
use sqlx::{PgConnection, PgPool};

const COLUMNS: &str = "id, name, value, created_at, updated_at";

/// Joined composition row: material columns plus the per-product quantity.
#[derive(sqlx::FromRow)]
struct LineRow {
    id: i64,
    name: String,
    stock_quantity: f64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    quantity: f64,
}

impl From<LineRow> for MaterialLine {
    fn from(row: LineRow) -> Self {
        MaterialLine {
            material: Material {
                id: row.id,
                name: row.name,
                stock_quantity: row.stock_quantity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            quantity: row.quantity,
        }
    }
}

pub struct ProductService;

impl ProductService {
    /// Insert the product row only (no composition).
    pub async fn create(pool: &PgPool, name: &str, value: f64) -> Result<Product, AppError> {
        let sql = format!("INSERT INTO products (name, value) VALUES ($1, $2) RETURNING {}", COLUMNS);
        tracing::debug!(sql = %sql, "create product");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .bind(value)
            .fetch_one(pool)
            .await?;
        Ok(product)
    }

    /// Scalar product rows, composition not joined.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {} FROM products ORDER BY id", COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
        Ok(products)
    }

    /// One product with its composition joined in.
    pub async fn get_detail(pool: &PgPool, id: i64) -> Result<Option<ProductDetail>, AppError> {
        let mut conn = pool.acquire().await?;
        detail_of(&mut conn, id).await
    }

    /// Update scalar fields only; the composition is untouched.
    pub async fn update(pool: &PgPool, id: i64, name: &str, value: f64) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET name = $2, value = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, "update product");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(name)
            .bind(value)
            .fetch_optional(pool)
            .await?;
        Ok(product)
    }

    /// Delete one product. The schema cascades the delete to its composition
    /// rows, so no link can outlive its product.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", COLUMNS);
        tracing::debug!(sql = %sql, id, "delete product");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(product)
    }

    /// Create the product row and one composition row per line in one
    /// transaction. An unknown material id or a duplicated line fails the
    /// insert and rolls the product row back with it.
    pub async fn create_with_composition(
        pool: &PgPool,
        name: &str,
        value: f64,
        lines: &[CompositionLine],
    ) -> Result<ProductDetail, AppError> {
        let mut tx = pool.begin().await?;
        let sql = format!("INSERT INTO products (name, value) VALUES ($1, $2) RETURNING {}", COLUMNS);
        tracing::debug!(sql = %sql, "create product (tx)");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .bind(value)
            .fetch_one(&mut *tx)
            .await?;
        for line in lines {
            insert_line(&mut tx, product.id, line).await?;
        }
        let materials = composition_of(&mut tx, product.id).await?;
        tx.commit().await?;
        Ok(ProductDetail::from_parts(product, materials))
    }

    /// Replace a product's scalar fields and its entire composition:
    /// update, delete all links, insert the new list, re-read — one
    /// transaction, commit or roll back as a unit. Returns `None` (nothing
    /// mutated) when the product does not exist. No version token: concurrent
    /// replacements on one product are last-write-wins at default isolation.
    pub async fn replace_composition(
        pool: &PgPool,
        id: i64,
        name: &str,
        value: f64,
        lines: &[CompositionLine],
    ) -> Result<Option<ProductDetail>, AppError> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "UPDATE products SET name = $2, value = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, "replace composition (tx)");
        let product = match sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(name)
            .bind(value)
            .fetch_optional(&mut *tx)
            .await?
        {
            Some(p) => p,
            // Dropping the transaction without commit rolls it back.
            None => return Ok(None),
        };

        sqlx::query("DELETE FROM product_materials WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            insert_line(&mut tx, id, line).await?;
        }

        let materials = composition_of(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(ProductDetail::from_parts(product, materials)))
    }
}

async fn insert_line(
    conn: &mut PgConnection,
    product_id: i64,
    line: &CompositionLine,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO product_materials (product_id, material_id, quantity) VALUES ($1, $2, $3)")
        .bind(product_id)
        .bind(line.material_id)
        .bind(line.quantity)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if error::is_foreign_key_violation(&e) {
                AppError::Validation(format!("material {} does not exist", line.material_id))
            } else if error::is_unique_violation(&e) {
                AppError::Validation(format!(
                    "materials contains material {} more than once",
                    line.material_id
                ))
            } else {
                AppError::Db(e)
            }
        })?;
    Ok(())
}

async fn composition_of(conn: &mut PgConnection, product_id: i64) -> Result<Vec<MaterialLine>, AppError> {
    let rows = sqlx::query_as::<_, LineRow>(
        "SELECT m.id, m.name, m.stock_quantity, m.created_at, m.updated_at, pm.quantity \
         FROM product_materials pm JOIN materials m ON m.id = pm.material_id \
         WHERE pm.product_id = $1 ORDER BY m.id",
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(MaterialLine::from).collect())
}

async fn detail_of(conn: &mut PgConnection, id: i64) -> Result<Option<ProductDetail>, AppError> {
    let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
    let product = match sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    {
        Some(p) => p,
        None => return Ok(None),
    };
    let materials = composition_of(conn, id).await?;
    Ok(Some(ProductDetail::from_parts(product, materials)))
}
