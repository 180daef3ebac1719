//! End-to-end tests for the newline-delimited transport.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use solver_rpc_server::builtin::{BuiltinEngine, BuiltinParser, BACKENDS};
use solver_rpc_server::config::ServerConfig;
use solver_rpc_server::engine::StaticRegistry;
use solver_rpc_server::server::RpcServer;
use solver_rpc_server::service::SolverService;

fn server(config: ServerConfig) -> RpcServer<BuiltinParser, BuiltinEngine> {
    let registry = Arc::new(StaticRegistry::new(BACKENDS.iter().copied()));
    let service = Arc::new(SolverService::new(BuiltinParser, BuiltinEngine, registry));
    RpcServer::new(config, service)
}

async fn exchange(config: ServerConfig, lines: &[String]) -> Vec<Value> {
    let input = lines.join("\n") + "\n";
    let output = server(config)
        .serve(input.as_bytes(), Vec::new())
        .await
        .expect("serve failed");
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("each reply is one JSON line"))
        .collect()
}

fn by_id(replies: &[Value]) -> HashMap<String, Value> {
    replies
        .iter()
        .filter(|r| r.get("id").is_some())
        .map(|r| (r["id"].to_string(), r.clone()))
        .collect()
}

#[tokio::test]
async fn every_request_gets_one_reply() {
    let lines = vec![
        json!({ "jsonrpc": "2.0", "id": 1, "method": "ping", "params": { "message": "" } }).to_string(),
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "solve",
            "params": { "model_content": "sig A {}\nrun { some A }" }
        })
        .to_string(),
        json!({ "jsonrpc": "2.0", "id": "three", "method": "solve", "params": { "model_content": "" } })
            .to_string(),
        json!({ "jsonrpc": "2.0", "method": "ping" }).to_string(),
        String::new(),
    ];

    let replies = exchange(ServerConfig::default(), &lines).await;
    assert_eq!(replies.len(), 3, "{replies:?}");

    let replies = by_id(&replies);
    assert_eq!(replies["1"]["result"]["message"], "pong");
    assert_eq!(replies["2"]["result"]["solution"], "---INSTANCE---\nA={A$0}\n");
    assert_eq!(replies["\"three\""]["result"]["success"], false);
}

#[tokio::test]
async fn malformed_lines_get_protocol_errors() {
    let lines = vec![
        "{not json".to_string(),
        json!({ "jsonrpc": "1.0", "id": 7, "method": "ping" }).to_string(),
    ];

    let replies = exchange(ServerConfig::default(), &lines).await;
    assert_eq!(replies.len(), 2);

    let parse_error = replies.iter().find(|r| r.get("id").is_none()).unwrap();
    assert_eq!(parse_error["error"]["code"], -32700);

    let invalid = replies.iter().find(|r| r["id"] == 7).unwrap();
    assert_eq!(invalid["error"]["code"], -32600);
}

#[tokio::test]
async fn oversized_messages_are_rejected() {
    let config = ServerConfig {
        max_message_bytes: 64,
        ..ServerConfig::default()
    };
    let long_model = "sig A {}\n".repeat(20);
    let lines = vec![
        json!({ "jsonrpc": "2.0", "id": 1, "method": "solve", "params": { "model_content": long_model } })
            .to_string(),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }).to_string(),
    ];

    let replies = exchange(config, &lines).await;
    assert_eq!(replies.len(), 2);
    let rejected = replies.iter().find(|r| r.get("id").is_none()).unwrap();
    assert_eq!(rejected["error"]["code"], -32700);
    let pong = replies.iter().find(|r| r["id"] == 2).unwrap();
    assert_eq!(pong["result"]["message"], "pong");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_solves_all_complete() {
    let lines: Vec<String> = (0..16)
        .map(|i| {
            json!({
                "jsonrpc": "2.0",
                "id": i,
                "method": "solve",
                "params": {
                    "model_content": format!("sig A {{}}\nrun {{ #A = {} }} for 3", i % 4),
                    "solver_type": if i % 2 == 0 { "exhaustive" } else { "minimal" },
                }
            })
            .to_string()
        })
        .collect();

    let replies = by_id(&exchange(ServerConfig::default(), &lines).await);
    assert_eq!(replies.len(), 16);
    for i in 0..16 {
        let result = &replies[&i.to_string()]["result"];
        assert_eq!(result["satisfiable"], true, "request {i}: {result}");
        let atoms = (0..i % 4).map(|n| format!("A${n}")).collect::<Vec<_>>().join(", ");
        assert_eq!(result["solution"], format!("---INSTANCE---\nA={{{atoms}}}\n"));
    }
}
