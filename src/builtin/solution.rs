use serde::Serialize;

use super::ast::CommandKind;
use crate::engine::{EngineError, EngineSolution, OutputFormat};

/// Atoms assigned to one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigAtoms {
    pub name: String,
    pub atoms: Vec<String>,
}

/// Signatures in declaration order with their atoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    pub sigs: Vec<SigAtoms>,
}

/// Outcome of one command. For `check`, an instance is a counterexample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub kind: CommandKind,
    pub instance: Option<Instance>,
}

#[derive(Serialize)]
struct JsonSolution<'a> {
    satisfiable: bool,
    outcome: &'static str,
    sigs: &'a [SigAtoms],
}

impl Solution {
    pub fn outcome(&self) -> &'static str {
        match (self.kind, self.instance.is_some()) {
            (CommandKind::Run, true) => "instance",
            (CommandKind::Run, false) => "unsatisfiable",
            (CommandKind::Check, true) => "counterexample",
            (CommandKind::Check, false) => "no_counterexample",
        }
    }

    fn to_text(&self) -> String {
        let Some(instance) = &self.instance else {
            return "---OUTCOME---\nUnsatisfiable.\n".to_string();
        };
        let mut out = String::from("---INSTANCE---\n");
        for sig in &instance.sigs {
            out.push_str(&sig.name);
            out.push_str("={");
            out.push_str(&sig.atoms.join(", "));
            out.push_str("}\n");
        }
        out
    }
}

impl EngineSolution for Solution {
    fn is_satisfiable(&self) -> bool {
        self.instance.is_some()
    }

    fn encode(&self, format: OutputFormat) -> Result<String, EngineError> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => {
                let payload = JsonSolution {
                    satisfiable: self.is_satisfiable(),
                    outcome: self.outcome(),
                    sigs: self.instance.as_ref().map_or(&[][..], |i| i.sigs.as_slice()),
                };
                serde_json::to_string(&payload)
                    .map_err(|e| EngineError::Unsupported(format!("JSON encoding failed: {e}")))
            }
        }
    }
}
