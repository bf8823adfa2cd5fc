//! Request validation for the typed payloads.
//!
//! Presence is checked structurally, never by truthiness: `0` is a valid
//! quantity and a valid value.

use crate::error::AppError;
use crate::model::CompositionLine;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MaterialPayload {
    pub name: String,
    pub stock_quantity: f64,
}

pub struct ProductPayload {
    pub name: String,
    pub value: f64,
}

pub struct RequestValidator;

impl RequestValidator {
    /// `{name, stock_quantity}` with name non-empty and quantity >= 0.
    pub fn material(body: &HashMap<String, Value>) -> Result<MaterialPayload, AppError> {
        let name = require_name(body)?;
        let stock_quantity = require_number(body, "stock_quantity")?;
        if stock_quantity < 0.0 {
            return Err(AppError::Validation("stock_quantity must be non-negative".into()));
        }
        Ok(MaterialPayload { name, stock_quantity })
    }

    /// `{name, value}` with name non-empty. Zero is a valid price.
    pub fn product(body: &HashMap<String, Value>) -> Result<ProductPayload, AppError> {
        let name = require_name(body)?;
        let value = require_number(body, "value")?;
        Ok(ProductPayload { name, value })
    }

    /// `id` from an update body.
    pub fn id(body: &HashMap<String, Value>) -> Result<i64, AppError> {
        body.get("id")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AppError::Validation("id is required".into()))?
            .as_i64()
            .ok_or_else(|| AppError::Validation("id must be an integer".into()))
    }

    /// `materials: [{id, stock_quantity}]`. The wire field for per-product
    /// consumption is named `stock_quantity`; it maps to the line quantity.
    /// An empty list is rejected unless `allow_empty` (composition replace
    /// may clear the list; create may not).
    pub fn composition(
        body: &HashMap<String, Value>,
        allow_empty: bool,
    ) -> Result<Vec<CompositionLine>, AppError> {
        let raw = body
            .get("materials")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AppError::Validation("materials is required".into()))?;
        let entries = raw
            .as_array()
            .ok_or_else(|| AppError::Validation("materials must be an array".into()))?;
        if entries.is_empty() && !allow_empty {
            return Err(AppError::Validation("materials must not be empty".into()));
        }

        let mut lines = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let obj = entry
                .as_object()
                .ok_or_else(|| AppError::Validation(format!("materials[{}] must be an object", i)))?;
            let material_id = obj
                .get("id")
                .filter(|v| !v.is_null())
                .ok_or_else(|| AppError::Validation(format!("materials[{}].id is required", i)))?
                .as_i64()
                .ok_or_else(|| AppError::Validation(format!("materials[{}].id must be an integer", i)))?;
            let quantity = obj
                .get("stock_quantity")
                .filter(|v| !v.is_null())
                .ok_or_else(|| {
                    AppError::Validation(format!("materials[{}].stock_quantity is required", i))
                })?
                .as_f64()
                .ok_or_else(|| {
                    AppError::Validation(format!("materials[{}].stock_quantity must be a number", i))
                })?;
            if quantity < 0.0 {
                return Err(AppError::Validation(format!(
                    "materials[{}].stock_quantity must be non-negative",
                    i
                )));
            }
            if lines.iter().any(|l: &CompositionLine| l.material_id == material_id) {
                return Err(AppError::Validation(format!(
                    "materials contains material {} more than once",
                    material_id
                )));
            }
            lines.push(CompositionLine { material_id, quantity });
        }
        Ok(lines)
    }
}

fn require_name(body: &HashMap<String, Value>) -> Result<String, AppError> {
    let name = body
        .get("name")
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::Validation("name is required".into()))?
        .as_str()
        .ok_or_else(|| AppError::Validation("name must be a string".into()))?;
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn require_number(body: &HashMap<String, Value>, col: &str) -> Result<f64, AppError> {
    body.get(col)
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::Validation(format!("{} is required", col)))?
        .as_f64()
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> HashMap<String, Value> {
        v.as_object().unwrap().clone().into_iter().collect()
    }

    #[test]
    fn material_round_trips_valid_fields() {
        let p = RequestValidator::material(&map(json!({"name": "Steel", "stock_quantity": 100}))).unwrap();
        assert_eq!(p.name, "Steel");
        assert_eq!(p.stock_quantity, 100.0);
    }

    #[test]
    fn zero_quantity_is_valid() {
        // Presence, not truthiness: 0 must pass.
        let p = RequestValidator::material(&map(json!({"name": "Glue", "stock_quantity": 0}))).unwrap();
        assert_eq!(p.stock_quantity, 0.0);
    }

    #[test]
    fn zero_value_is_valid() {
        let p = RequestValidator::product(&map(json!({"name": "Sample", "value": 0}))).unwrap();
        assert_eq!(p.value, 0.0);
    }

    #[test]
    fn missing_quantity_is_rejected() {
        let err = RequestValidator::material(&map(json!({"name": "Steel"}))).unwrap_err();
        assert!(err.to_string().contains("stock_quantity is required"));
    }

    #[test]
    fn null_name_is_rejected() {
        let err =
            RequestValidator::material(&map(json!({"name": null, "stock_quantity": 1}))).unwrap_err();
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err =
            RequestValidator::material(&map(json!({"name": "  ", "stock_quantity": 1}))).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err =
            RequestValidator::material(&map(json!({"name": "Steel", "stock_quantity": -1}))).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn string_quantity_is_rejected() {
        let err =
            RequestValidator::material(&map(json!({"name": "Steel", "stock_quantity": "10"}))).unwrap_err();
        assert!(err.to_string().contains("must be a number"));
    }

    #[test]
    fn composition_maps_wire_shape_to_lines() {
        let lines = RequestValidator::composition(
            &map(json!({"materials": [{"id": 1, "stock_quantity": 4}, {"id": 2, "stock_quantity": 1}]})),
            false,
        )
        .unwrap();
        assert_eq!(
            lines,
            vec![
                CompositionLine { material_id: 1, quantity: 4.0 },
                CompositionLine { material_id: 2, quantity: 1.0 },
            ]
        );
    }

    #[test]
    fn empty_composition_is_rejected_on_create() {
        let err = RequestValidator::composition(&map(json!({"materials": []})), false).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn empty_composition_is_allowed_on_replace() {
        let lines = RequestValidator::composition(&map(json!({"materials": []})), true).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn missing_materials_is_rejected() {
        let err = RequestValidator::composition(&map(json!({})), true).unwrap_err();
        assert!(err.to_string().contains("materials is required"));
    }

    #[test]
    fn duplicate_material_is_rejected() {
        let err = RequestValidator::composition(
            &map(json!({"materials": [{"id": 1, "stock_quantity": 2}, {"id": 1, "stock_quantity": 3}]})),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn zero_line_quantity_is_valid() {
        let lines = RequestValidator::composition(
            &map(json!({"materials": [{"id": 1, "stock_quantity": 0}]})),
            false,
        )
        .unwrap();
        assert_eq!(lines[0].quantity, 0.0);
    }

    #[test]
    fn id_must_be_an_integer() {
        assert_eq!(RequestValidator::id(&map(json!({"id": 3}))).unwrap(), 3);
        assert!(RequestValidator::id(&map(json!({"id": "3"}))).is_err());
        assert!(RequestValidator::id(&map(json!({}))).is_err());
    }
}
