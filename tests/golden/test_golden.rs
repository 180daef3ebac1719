//! Golden outputs for the fixture models.
//!
//! Each case solves one command of a fixture through `handlers::dispatch`
//! and compares the encoded solution with a checked-in file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use solver_rpc_server::builtin::{BuiltinEngine, BuiltinParser, BACKENDS};
use solver_rpc_server::engine::StaticRegistry;
use solver_rpc_server::handlers;
use solver_rpc_server::protocol::{JsonRpcRequest, RpcId};
use solver_rpc_server::service::SolverService;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/fixtures")
}

fn expected_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/expected")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_root().join(name)).expect("fixture missing")
}

fn read_expected(name: &str) -> String {
    fs::read_to_string(expected_path(name))
        .expect("expected file missing")
        .trim_end()
        .to_string()
}

struct Case {
    fixture: &'static str,
    command: &'static str,
    solver: &'static str,
    format: &'static str,
    expected: &'static str,
    rendered: &'static str,
}

const CASES: &[Case] = &[
    Case {
        fixture: "people.als",
        command: "crowded",
        solver: "exhaustive",
        format: "text",
        expected: "people_crowded.txt",
        rendered: "Run crowded for 3",
    },
    Case {
        fixture: "people.als",
        command: "enoughTeachers",
        solver: "exhaustive",
        format: "text",
        expected: "people_enough_teachers.txt",
        rendered: "Check enoughTeachers",
    },
    Case {
        fixture: "zoo.als",
        command: "",
        solver: "minimal",
        format: "text",
        expected: "zoo_busy.txt",
        rendered: "Run busy for 3",
    },
    Case {
        fixture: "zoo.als",
        command: "open",
        solver: "exhaustive",
        format: "text",
        expected: "zoo_open_exhaustive.txt",
        rendered: "Run open",
    },
    Case {
        fixture: "zoo.als",
        command: "open",
        solver: "minimal",
        format: "text",
        expected: "zoo_open_minimal.txt",
        rendered: "Run open",
    },
    Case {
        fixture: "zoo.als",
        command: "noLions",
        solver: "exhaustive",
        format: "text",
        expected: "zoo_no_lions.txt",
        rendered: "Check noLions for 2",
    },
];

async fn solve(fixture: &str, command: &str, solver: &str, format: &str) -> Value {
    let registry = Arc::new(StaticRegistry::new(BACKENDS.iter().copied()));
    let service = Arc::new(SolverService::new(BuiltinParser, BuiltinEngine, registry));
    let req = JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(1)),
        method: "solve".into(),
        params: Some(json!({
            "model_content": read_fixture(fixture),
            "command": command,
            "solver_type": solver,
            "output_format": format,
        })),
    };
    let resp = handlers::dispatch(&req, &service).await.unwrap();
    let value = serde_json::to_value(&resp).unwrap();
    assert!(value.get("error").is_none(), "{fixture}/{command}: {value}");
    value["result"].clone()
}

#[tokio::test]
async fn golden_text_solutions() {
    for case in CASES {
        let result = solve(case.fixture, case.command, case.solver, case.format).await;
        let label = format!("{} `{}` on {}", case.fixture, case.command, case.solver);

        assert_eq!(result["success"], true, "{label}");
        assert_eq!(result["command"], case.rendered, "{label}");
        assert_eq!(result["warnings"], Value::Null, "{label}: no warnings expected");
        let solution = result["solution"].as_str().unwrap();
        assert_eq!(solution.trim_end(), read_expected(case.expected), "{label}");
    }
}

#[tokio::test]
async fn golden_json_solution() {
    let result = solve("people.als", "crowded", "exhaustive", "json").await;
    let actual: Value = serde_json::from_str(result["solution"].as_str().unwrap()).unwrap();
    let expected: Value = serde_json::from_str(&read_expected("people_crowded.json")).unwrap();
    assert_eq!(actual, expected);

    // Single line, fields in declaration order.
    let raw = result["solution"].as_str().unwrap();
    assert!(!raw.contains('\n'));
    assert!(raw.starts_with(r#"{"satisfiable":true,"outcome":"instance","sigs":[{"name":"Person""#));
}

#[tokio::test]
async fn golden_fixtures_parse_cleanly() {
    for fixture in ["people.als", "zoo.als"] {
        let result = solve(fixture, "", "exhaustive", "text").await;
        assert_eq!(result["success"], true, "{fixture}");
    }
}
