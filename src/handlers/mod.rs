//! HTTP handlers for material and product CRUD.

pub mod material;
pub mod product;

use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;

/// Bodies are taken as raw JSON so field presence is checked explicitly
/// (missing and `0` are different things) and every rejection is a 400 with
/// an `{"error": ...}` body.
pub(crate) fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_bodies_are_accepted() {
        let map = body_to_map(json!({"name": "Steel"})).unwrap();
        assert_eq!(map.get("name"), Some(&json!("Steel")));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(body_to_map(json!([1, 2])).is_err());
        assert!(body_to_map(json!("text")).is_err());
        assert!(body_to_map(json!(null)).is_err());
    }
}
