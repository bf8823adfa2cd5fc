//! Material handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::handlers::body_to_map;
use crate::service::{MaterialService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let materials = MaterialService::list(&state.pool).await?;
    Ok(Json(materials))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let material = MaterialService::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("material {}", id)))?;
    Ok(Json(material))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let payload = RequestValidator::material(&body)?;
    let material = MaterialService::create(&state.pool, &payload.name, payload.stock_quantity).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// PUT /materials/update carries the id in the body, not the path.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let id = RequestValidator::id(&body)?;
    let payload = RequestValidator::material(&body)?;
    let material = MaterialService::update(&state.pool, id, &payload.name, payload.stock_quantity)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("material {}", id)))?;
    Ok(Json(material))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let material = MaterialService::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("material {}", id)))?;
    Ok(Json(material))
}
