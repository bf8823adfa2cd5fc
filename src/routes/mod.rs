//! Router assembly: common, material, and product routes plus the CORS and
//! body-limit layers.

pub mod common;
pub mod material;
pub mod product;

pub use common::common_routes;
pub use material::material_routes;
pub use product::product_routes;

use crate::state::AppState;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The full application router: permissive CORS (any origin,
/// GET/POST/PUT/DELETE) for browser frontends, plus a request body cap.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(material_routes(state.clone()))
        .merge(product_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    //! Router-level tests that never reach the database: a lazy pool backs
    //! the state, and every request below is settled by routing or
    //! validation first.

    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unreachable")
            .unwrap();
        app(AppState { pool })
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_message(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        v["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn health_answers_without_a_database() {
        let resp = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn version_reports_the_package() {
        let resp = test_app()
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["name"], "inventory-api");
    }

    #[tokio::test]
    async fn material_create_without_quantity_is_400() {
        let resp = test_app()
            .oneshot(json_request(Method::POST, "/materials/create", r#"{"name": "Steel"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(resp).await, "stock_quantity is required");
    }

    #[tokio::test]
    async fn material_create_with_negative_quantity_is_400() {
        let resp = test_app()
            .oneshot(json_request(
                Method::POST,
                "/materials/create",
                r#"{"name": "Steel", "stock_quantity": -3}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn material_update_without_id_is_400() {
        let resp = test_app()
            .oneshot(json_request(
                Method::PUT,
                "/materials/update",
                r#"{"name": "Steel", "stock_quantity": 5}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(resp).await, "id is required");
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_rejected() {
        let resp = test_app()
            .oneshot(Request::builder().uri("/materials/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn product_create_with_empty_composition_is_400() {
        let resp = test_app()
            .oneshot(json_request(
                Method::POST,
                "/products/create",
                r#"{"name": "Chair", "value": 49.99, "materials": []}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(resp).await, "materials must not be empty");
    }

    #[tokio::test]
    async fn product_create_with_duplicate_material_is_400() {
        let resp = test_app()
            .oneshot(json_request(
                Method::POST,
                "/products/create",
                r#"{"name": "Chair", "value": 1, "materials": [
                    {"id": 1, "stock_quantity": 2}, {"id": 1, "stock_quantity": 3}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("more than once"));
    }

    #[tokio::test]
    async fn array_body_is_rejected_as_bad_request() {
        let resp = test_app()
            .oneshot(json_request(Method::POST, "/materials/create", r#"[1, 2, 3]"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
