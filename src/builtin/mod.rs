//! Reference engine for a small Alloy-flavoured modelling language.
//!
//! Models declare signatures with multiplicities and `extends` hierarchies,
//! facts, predicates, assertions and `run`/`check` commands. The engine
//! searches for signature cardinalities that satisfy a command, bounded by
//! the command's scope.

pub mod ast;
mod check;
pub mod lexer;
pub mod parser;
pub mod solution;
pub mod solver;

use crate::engine::{Diagnostic, Diagnostics, EngineError, ModelParser, ParsedModel};

pub use ast::{Command, CommandKind, Module};
pub use solution::{Instance, SigAtoms, Solution};
pub use solver::{BuiltinEngine, Strategy, DEFAULT_SCOPE, DEFAULT_SEARCH_LIMIT};

/// Backend identifiers the built-in engine can execute.
pub const BACKENDS: &[&str] = &["exhaustive", "minimal"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinParser;

impl ModelParser for BuiltinParser {
    type Module = Module;
    type Command = Command;

    fn parse(
        &self,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ParsedModel<Module, Command>, EngineError> {
        let tokens = lexer::tokenize(source, diagnostics);
        let (module, commands) = parser::parse(&tokens, diagnostics);
        if let Some(first) = diagnostics.errors().next() {
            return Err(EngineError::Syntax(located(first)));
        }

        check::check(&module, &commands, diagnostics);
        if let Some(first) = diagnostics.errors().next() {
            return Err(EngineError::Type(located(first)));
        }

        Ok(ParsedModel { module, commands })
    }
}

fn located(diagnostic: &Diagnostic) -> String {
    match diagnostic.pos {
        Some(pos) => format!("{pos}: {}", diagnostic.message),
        None => diagnostic.message.clone(),
    }
}
