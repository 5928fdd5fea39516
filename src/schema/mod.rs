//! Import payload validation against the embedded checklist schema
//!
//! The migration engine is the real validated-input boundary; this check
//! runs first at the CLI layer so obviously malformed payloads fail with
//! readable, field-level diagnostics instead of a repair pass over garbage.
//! Ids and indices are deliberately unconstrained here; repairing those is
//! the migration engine's job.

use jsonschema::{validator_for, Validator as JsonValidator};
use rust_embed::Embed;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

const CHECKLIST_SCHEMA: &str = "checklist.schema.json";

/// Errors raised while compiling or applying the import schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("embedded schema '{0}' is missing")]
    SchemaMissing(&'static str),

    #[error("embedded schema '{0}' is invalid: {1}")]
    SchemaInvalid(&'static str, String),

    #[error("import payload failed schema validation")]
    PayloadInvalid {
        /// One `path: message` line per violation
        violations: Vec<String>,
    },
}

/// Compiled validator for import payloads
pub struct ImportValidator {
    compiled: JsonValidator,
}

impl ImportValidator {
    /// Compile the embedded checklist schema
    pub fn new() -> Result<Self, SchemaError> {
        let file = EmbeddedSchemas::get(CHECKLIST_SCHEMA)
            .ok_or(SchemaError::SchemaMissing(CHECKLIST_SCHEMA))?;
        let schema: JsonValue = serde_json::from_slice(&file.data)
            .map_err(|e| SchemaError::SchemaInvalid(CHECKLIST_SCHEMA, e.to_string()))?;
        let compiled = validator_for(&schema)
            .map_err(|e| SchemaError::SchemaInvalid(CHECKLIST_SCHEMA, e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate a payload, collecting every violation
    pub fn validate(&self, payload: &JsonValue) -> Result<(), SchemaError> {
        let violations: Vec<String> = self
            .compiled
            .iter_errors(payload)
            .map(|error| format!("{}: {}", error.instance_path, error))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::PayloadInvalid { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload_passes() {
        let validator = ImportValidator::new().unwrap();
        let payload = json!([{
            "id": "CAT-A",
            "name": "露营装备",
            "icon": "🏕️",
            "items": [{
                "id": "ITEM-A", "index": 1, "name": "帐篷",
                "quantity": 1, "quantityUnit": "个",
                "weight": 2000, "weightUnit": "g",
                "price": 500, "priceUnit": "人民币"
            }]
        }]);
        validator.validate(&payload).unwrap();
    }

    #[test]
    fn test_partial_records_pass() {
        // Missing ids, indices, and prices are the migration engine's job
        let validator = ImportValidator::new().unwrap();
        let payload = json!([{ "name": "装备", "items": [{ "name": "x" }] }]);
        validator.validate(&payload).unwrap();
    }

    #[test]
    fn test_non_array_payload_fails() {
        let validator = ImportValidator::new().unwrap();
        let err = validator.validate(&json!({ "name": "装备" })).unwrap_err();
        assert!(matches!(err, SchemaError::PayloadInvalid { .. }));
    }

    #[test]
    fn test_category_without_name_fails() {
        let validator = ImportValidator::new().unwrap();
        let err = validator.validate(&json!([{ "icon": "🎒" }])).unwrap_err();
        match err {
            SchemaError::PayloadInvalid { violations } => {
                assert!(!violations.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrongly_typed_field_fails() {
        let validator = ImportValidator::new().unwrap();
        let payload = json!([{ "name": "装备", "items": [{ "name": "x", "weight": "heavy" }] }]);
        assert!(validator.validate(&payload).is_err());
    }
}
