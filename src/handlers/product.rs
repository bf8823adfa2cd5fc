//! Product handlers: list, read with composition, create, replace, delete.

use crate::error::AppError;
use crate::handlers::body_to_map;
use crate::service::{ProductService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let products = ProductService::list(&state.pool).await?;
    Ok(Json(products))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let detail = ProductService::get_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;
    Ok(Json(detail))
}

/// POST /products/create requires a non-empty composition.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let payload = RequestValidator::product(&body)?;
    let lines = RequestValidator::composition(&body, false)?;
    let detail =
        ProductService::create_with_composition(&state.pool, &payload.name, payload.value, &lines).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /products/update replaces the scalar fields and the entire
/// composition. An empty materials list clears the composition.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let id = RequestValidator::id(&body)?;
    let payload = RequestValidator::product(&body)?;
    let lines = RequestValidator::composition(&body, true)?;
    let detail = ProductService::replace_composition(&state.pool, id, &payload.name, payload.value, &lines)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;
    Ok(Json(detail))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let product = ProductService::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;
    Ok(Json(product))
}
