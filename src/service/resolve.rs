use tracing::debug;

use super::error::SolveError;
use crate::engine::{Diagnostics, ModelCommand, ModelParser, ParsedModel};

/// Parse `source`, failing if the parser reports any error.
///
/// The failure message carries every diagnostic collected during the parse,
/// not just the one the parser returned.
pub fn load_model<P: ModelParser>(
    parser: &P,
    source: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ParsedModel<P::Module, P::Command>, SolveError> {
    match parser.parse(source, diagnostics) {
        Ok(model) if !diagnostics.has_errors() => {
            debug!(commands = model.commands.len(), "model parsed");
            Ok(model)
        }
        Ok(_) => Err(SolveError::ModelLoad(diagnostics.render())),
        Err(err) => {
            let message = if diagnostics.has_errors() {
                diagnostics.render()
            } else if diagnostics.is_empty() {
                err.to_string()
            } else {
                format!("{err}\n{}", diagnostics.render())
            };
            Err(SolveError::ModelLoad(message))
        }
    }
}

/// Select the command labelled `name`, or the first command when `name` is
/// empty.
pub fn find_command<'a, C: ModelCommand>(
    commands: &'a [C],
    name: &str,
) -> Result<&'a C, SolveError> {
    if commands.is_empty() {
        return Err(SolveError::NoCommands);
    }
    if name.is_empty() {
        return Ok(&commands[0]);
    }
    commands
        .iter()
        .find(|c| c.label() == name)
        .ok_or_else(|| SolveError::CommandNotFound(name.to_string()))
}
