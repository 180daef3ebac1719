//! JSON Schemas (draft 2020-12) for the wire payloads, with a validation
//! helper used by the test suites and by clients embedding the service.

use jsonschema::validator_for;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed: {0}")]
    ValidationFailed(String),
}

/// Result object of a `solve` call.
pub const SOLVE_RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Solve Response v1",
  "type": "object",
  "required": ["success", "solving_time_ms"],
  "additionalProperties": false,
  "properties": {
    "success": { "type": "boolean" },
    "solution": { "type": "string" },
    "solving_time_ms": { "type": "integer", "minimum": 0 },
    "command": { "type": "string", "minLength": 1 },
    "satisfiable": { "type": "boolean" },
    "warnings": { "type": "array", "items": { "type": "string" } },
    "error_message": { "type": "string", "minLength": 1 }
  },
  "if": { "properties": { "success": { "const": true } } },
  "then": { "required": ["solution", "command", "satisfiable"] },
  "else": { "required": ["error_message"] }
}"#;

/// Result object of a `ping` call.
pub const PING_RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Ping Response v1",
  "type": "object",
  "required": ["message", "timestamp", "version", "available_solvers"],
  "additionalProperties": false,
  "properties": {
    "message": { "type": "string", "minLength": 1 },
    "timestamp": { "type": "integer" },
    "version": { "type": "string", "minLength": 1 },
    "available_solvers": { "type": "array", "items": { "type": "string" } }
  }
}"#;

/// JSON-RPC error object carrying a classified status in `data`.
pub const RPC_ERROR_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "RPC Error v1",
  "type": "object",
  "required": ["code", "message"],
  "additionalProperties": false,
  "properties": {
    "code": { "type": "integer" },
    "message": { "type": "string", "minLength": 1 },
    "data": {
      "type": "object",
      "required": ["status", "message"],
      "additionalProperties": false,
      "properties": {
        "status": { "enum": ["invalid_argument", "unimplemented", "internal"] },
        "message": { "type": "string", "minLength": 1 }
      }
    }
  }
}"#;

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
pub fn validate_json(schema_str: &str, instance_str: &str) -> Result<(), SchemaValidationError> {
    let instance_json: Value = serde_json::from_str(instance_str)?;
    validate_value(schema_str, &instance_json)
}

/// Like [`validate_json`] for an already-parsed instance.
///
/// The error carries the first violation reported by the validator.
pub fn validate_value(schema_str: &str, instance: &Value) -> Result<(), SchemaValidationError> {
    let schema_json: Value = serde_json::from_str(schema_str)?;
    let validator = validator_for(&schema_json)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let first = validator.iter_errors(instance).next().map(|e| e.to_string());
    match first {
        None => Ok(()),
        Some(err) => Err(SchemaValidationError::ValidationFailed(err)),
    }
}
