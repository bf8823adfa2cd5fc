//! Typed client for the inventory API, mirroring the server routes.

use crate::error::ErrorBody;
use crate::model::{CompositionLine, Material, Product, ProductDetail};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn add_material(&self, name: &str, stock_quantity: f64) -> Result<Material, ClientError> {
        let resp = self
            .http
            .post(self.url("/materials/create"))
            .json(&json!({"name": name, "stock_quantity": stock_quantity}))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_all_materials(&self) -> Result<Vec<Material>, ClientError> {
        decode(self.http.get(self.url("/materials/all")).send().await?).await
    }

    pub async fn get_material(&self, id: i64) -> Result<Material, ClientError> {
        decode(self.http.get(self.url(&format!("/materials/{}", id))).send().await?).await
    }

    pub async fn update_material(
        &self,
        id: i64,
        name: &str,
        stock_quantity: f64,
    ) -> Result<Material, ClientError> {
        let resp = self
            .http
            .put(self.url("/materials/update"))
            .json(&json!({"id": id, "name": name, "stock_quantity": stock_quantity}))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_material(&self, id: i64) -> Result<Material, ClientError> {
        decode(
            self.http
                .delete(self.url(&format!("/materials/delete/{}", id)))
                .send()
                .await?,
        )
        .await
    }

    pub async fn add_product(
        &self,
        name: &str,
        value: f64,
        materials: &[CompositionLine],
    ) -> Result<ProductDetail, ClientError> {
        let resp = self
            .http
            .post(self.url("/products/create"))
            .json(&json!({"name": name, "value": value, "materials": composition_body(materials)}))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_all_products(&self) -> Result<Vec<Product>, ClientError> {
        decode(self.http.get(self.url("/products/all")).send().await?).await
    }

    pub async fn get_product(&self, id: i64) -> Result<ProductDetail, ClientError> {
        decode(self.http.get(self.url(&format!("/products/{}", id))).send().await?).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        name: &str,
        value: f64,
        materials: &[CompositionLine],
    ) -> Result<ProductDetail, ClientError> {
        let resp = self
            .http
            .put(self.url("/products/update"))
            .json(&json!({
                "id": id,
                "name": name,
                "value": value,
                "materials": composition_body(materials)
            }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<Product, ClientError> {
        decode(
            self.http
                .delete(self.url(&format!("/products/delete/{}", id)))
                .send()
                .await?,
        )
        .await
    }
}

/// Wire shape for a composition entry: the per-product quantity travels in
/// the `stock_quantity` field.
fn composition_body(materials: &[CompositionLine]) -> Vec<Value> {
    materials
        .iter()
        .map(|l| json!({"id": l.material_id, "stock_quantity": l.quantity}))
        .collect()
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json().await?)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_body_uses_the_wire_field_name() {
        let body = composition_body(&[CompositionLine { material_id: 7, quantity: 2.5 }]);
        assert_eq!(body, vec![json!({"id": 7, "stock_quantity": 2.5})]);
    }

    #[test]
    fn error_message_unwraps_the_error_envelope() {
        assert_eq!(error_message(r#"{"error": "name is required"}"#), "name is required");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("length limit exceeded"), "length limit exceeded");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/materials/all"), "http://localhost:3000/materials/all");
    }
}
