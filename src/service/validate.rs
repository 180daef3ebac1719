use super::error::ValidationError;
use crate::protocol::SolveRequest;

/// Cheap structural checks only; model syntax is left to the parser, whose
/// diagnostics are more precise than anything a pre-check could produce.
pub fn validate(request: &SolveRequest) -> Result<(), ValidationError> {
    if request.model_content.trim().is_empty() {
        return Err(ValidationError::EmptyModel);
    }
    Ok(())
}
