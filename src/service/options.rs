use std::collections::BTreeMap;
use std::str::FromStr;

use super::error::SolveError;
use crate::engine::{BackendRegistry, OutputFormat, SolverConfig};

/// Option overriding the scope of commands that do not declare one.
pub const OPTION_SCOPE: &str = "scope";
/// Option bounding the number of assignments the engine may examine.
pub const OPTION_MAX_ASSIGNMENTS: &str = "max_assignments";

/// Resolve the requested backend against the registry.
///
/// An empty identifier selects the first registered backend.
pub fn select_backend(
    registry: &dyn BackendRegistry,
    requested: &str,
) -> Result<String, SolveError> {
    if requested.is_empty() {
        return registry
            .list_available()
            .into_iter()
            .next()
            .ok_or(SolveError::NoSolvers);
    }
    if registry.is_available(requested) {
        Ok(requested.to_string())
    } else {
        Err(SolveError::SolverUnavailable(requested.to_string()))
    }
}

/// Build the engine configuration for one call.
///
/// Recognized options are parsed into typed fields; everything else is
/// forwarded in `extra` for the engine to accept or reject.
pub fn translate(
    backend: String,
    options: &BTreeMap<String, String>,
    output_format: OutputFormat,
) -> Result<SolverConfig, SolveError> {
    let mut config = SolverConfig {
        backend,
        output_format,
        default_scope: None,
        search_limit: None,
        extra: BTreeMap::new(),
    };

    for (name, value) in options {
        match name.as_str() {
            OPTION_SCOPE => config.default_scope = Some(parse_option::<u32>(name, value)?),
            OPTION_MAX_ASSIGNMENTS => {
                let limit = parse_option::<u64>(name, value)?;
                if limit == 0 {
                    return Err(invalid(name, value, "must be greater than zero"));
                }
                config.search_limit = Some(limit);
            }
            _ => {
                config.extra.insert(name.clone(), value.clone());
            }
        }
    }

    Ok(config)
}

fn parse_option<T>(name: &str, value: &str) -> Result<T, SolveError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(name, value, &e.to_string()))
}

fn invalid(name: &str, value: &str, reason: &str) -> SolveError {
    SolveError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
