//! Product routes, same path shape as materials.

use crate::handlers::product::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/products/all", get(list))
        .route("/products/create", post(create))
        .route("/products/update", put(update))
        .route("/products/delete/:id", delete(delete_handler))
        .route("/products/:id", get(read))
        .with_state(state)
}
