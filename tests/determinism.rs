//! Identical requests must produce byte-identical solutions, whether run one
//! after another or concurrently.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use solver_rpc_server::builtin::{BuiltinEngine, BuiltinParser, BACKENDS};
use solver_rpc_server::engine::{OutputFormat, StaticRegistry};
use solver_rpc_server::protocol::SolveRequest;
use solver_rpc_server::service::SolverService;

const MODEL: &str = "abstract sig Shape {}
sig Circle, Square extends Shape {}
lone sig Canvas {}
fact { #Shape > 0 implies one Canvas }
pred busy { #Circle >= 1 and #Square >= 2 }
run busy for 3
";

fn service() -> SolverService<BuiltinParser, BuiltinEngine> {
    let registry = Arc::new(StaticRegistry::new(BACKENDS.iter().copied()));
    SolverService::new(BuiltinParser, BuiltinEngine, registry)
}

fn digest(service: &SolverService<BuiltinParser, BuiltinEngine>, req: &SolveRequest) -> [u8; 32] {
    let resp = service.solve(req).expect("solve failed");
    let mut hasher = Sha256::new();
    hasher.update(resp.command.unwrap_or_default().as_bytes());
    hasher.update(resp.solution.unwrap_or_default().as_bytes());
    hasher.update(resp.warnings.join("\n").as_bytes());
    hasher.finalize().into()
}

fn request(solver: &str, format: OutputFormat) -> SolveRequest {
    SolveRequest {
        model_content: MODEL.to_string(),
        solver_type: solver.to_string(),
        output_format: format,
        ..SolveRequest::default()
    }
}

#[test]
fn repeated_solves_are_byte_identical() {
    let service = service();
    for solver in BACKENDS {
        for format in [OutputFormat::Text, OutputFormat::Json] {
            let req = request(solver, format);
            let first = digest(&service, &req);
            for _ in 0..10 {
                assert_eq!(digest(&service, &req), first, "{solver}/{format}");
            }
        }
    }
}

#[test]
fn fresh_services_agree() {
    let req = request("minimal", OutputFormat::Text);
    assert_eq!(digest(&service(), &req), digest(&service(), &req));
}

#[test]
fn concurrent_solves_match_sequential() {
    let service = service();
    let req = request("exhaustive", OutputFormat::Json);
    let expected = digest(&service, &req);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|_| scope.spawn(|| digest(&service, &req)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn solution_content_is_stable() {
    let resp = service()
        .solve(&request("exhaustive", OutputFormat::Text))
        .unwrap();
    assert_eq!(
        resp.solution.as_deref(),
        Some(
            "---INSTANCE---\n\
             Shape={Circle$0, Square$0, Square$1}\n\
             Circle={Circle$0}\n\
             Square={Square$0, Square$1}\n\
             Canvas={Canvas$0}\n"
        )
    );
}
