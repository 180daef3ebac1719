use solver_rpc_server::schema::{
    validate_json, validate_value, SchemaValidationError, PING_RESPONSE_SCHEMA,
    SOLVE_RESPONSE_SCHEMA,
};

#[test]
fn json_schema_harness_validates_instance() {
    let schema = r#"{
      "$schema": "https://json-schema.org/draft/2020-12/schema",
      "type": "object",
      "required": ["status"],
      "properties": {
        "status": { "enum": ["invalid_argument", "unimplemented", "internal"] }
      }
    }"#;

    validate_json(schema, r#"{ "status": "internal" }"#).expect("schema validation failed");
    assert!(matches!(
        validate_json(schema, r#"{ "status": "ok" }"#),
        Err(SchemaValidationError::ValidationFailed(_))
    ));
}

#[test]
fn malformed_inputs_are_reported() {
    assert!(matches!(
        validate_json("{", "{}"),
        Err(SchemaValidationError::SchemaParse(_))
    ));
    assert!(matches!(
        validate_json(SOLVE_RESPONSE_SCHEMA, "not json"),
        Err(SchemaValidationError::SchemaParse(_))
    ));
}

#[test]
fn solve_response_schema_requires_solution_on_success() {
    let ok = r#"{
      "success": true,
      "solution": "---OUTCOME---\nUnsatisfiable.\n",
      "solving_time_ms": 3,
      "command": "Run show",
      "satisfiable": false
    }"#;
    validate_json(SOLVE_RESPONSE_SCHEMA, ok).unwrap();

    let missing = r#"{ "success": true, "solving_time_ms": 3 }"#;
    assert!(validate_json(SOLVE_RESPONSE_SCHEMA, missing).is_err());

    let rejected = serde_json::json!({
        "success": false,
        "solving_time_ms": 0,
        "error_message": "Model content cannot be null or empty"
    });
    validate_value(SOLVE_RESPONSE_SCHEMA, &rejected).unwrap();
}

#[test]
fn ping_response_schema() {
    let ping = r#"{
      "message": "pong",
      "timestamp": 1700000000000,
      "version": "0.1.0",
      "available_solvers": ["exhaustive"]
    }"#;
    validate_json(PING_RESPONSE_SCHEMA, ping).unwrap();
    assert!(validate_json(PING_RESPONSE_SCHEMA, r#"{ "message": "" }"#).is_err());
}
