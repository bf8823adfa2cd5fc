//! Material routes. Collection verbs are spelled out in the path
//! (`/all`, `/create`, `/update`, `/delete/:id`).

use crate::handlers::material::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn material_routes(state: AppState) -> Router {
    Router::new()
        .route("/materials/all", get(list))
        .route("/materials/create", post(create))
        .route("/materials/update", put(update))
        .route("/materials/delete/:id", delete(delete_handler))
        .route("/materials/:id", get(read))
        .with_state(state)
}
