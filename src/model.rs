//! Entity types: materials, products, and the composition linking them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw stock item with an on-hand quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub stock_quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sellable item with a price. Its bill of materials lives in
/// `product_materials` and is only joined in on the detail read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One composition entry to create or replace: how many units of a material
/// one unit of the product consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionLine {
    pub material_id: i64,
    pub quantity: f64,
}

/// One joined composition entry as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub material: Material,
    pub quantity: f64,
}

/// Product with its composition joined in (the `GET /products/:id` shape).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub materials: Vec<MaterialLine>,
}

impl ProductDetail {
    pub fn from_parts(product: Product, materials: Vec<MaterialLine>) -> Self {
        ProductDetail {
            id: product.id,
            name: product.name,
            value: product.value,
            created_at: product.created_at,
            updated_at: product.updated_at,
            materials,
        }
    }
}
