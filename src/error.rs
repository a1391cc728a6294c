//! Platform error taxonomy
//!
//! Build and test failures are deliberately absent: a non-zero exit from the
//! external toolchain is captured into `BuildOutcome`/`TestOutcome` and never
//! crosses the `BuildRunner` boundary as an error.

use crate::materialize::MaterializeError;
use crate::provider::ProviderError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Malformed or missing required fields in a request; always recoverable
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Unknown project or conversation id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A generate/build pipeline is already running for this project, or the
    /// project is not in a status that allows the requested operation
    #[error("Conflict for project {id}: {message}")]
    Conflict { id: Uuid, message: String },

    /// Upstream completion failure; the conversation is left unmodified so a
    /// retry is safe
    #[error("AI provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A generated file path escaped the project root; fatal for the run
    #[error("Path safety violation: {0}")]
    PathSafety(String),

    /// Filesystem failure while materializing or deleting project files
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive creation failure
    #[error("Archive error: {0}")]
    Archive(String),

    /// Catch-all; the owning project transitions to `failed`
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlatformError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn project_not_found(id: Uuid) -> Self {
        PlatformError::NotFound {
            entity: "Project",
            id,
        }
    }

    pub fn conversation_not_found(id: Uuid) -> Self {
        PlatformError::NotFound {
            entity: "Conversation",
            id,
        }
    }

    pub fn conflict(id: Uuid, message: impl Into<String>) -> Self {
        PlatformError::Conflict {
            id,
            message: message.into(),
        }
    }
}

impl From<MaterializeError> for PlatformError {
    fn from(err: MaterializeError) -> Self {
        match err {
            MaterializeError::PathTraversal { path } => {
                PlatformError::PathSafety(format!("path traversal detected: {}", path))
            }
            MaterializeError::EscapesRoot { path } => {
                PlatformError::PathSafety(format!("path escapes project root: {}", path))
            }
            MaterializeError::Io(e) => PlatformError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = PlatformError::validation("name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation failed for 'name': must not be empty"
        );
    }

    #[test]
    fn test_not_found_display() {
        let id = Uuid::nil();
        let err = PlatformError::project_not_found(id);
        assert!(err.to_string().contains("Project not found"));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_path_safety_from_materialize_error() {
        let err: PlatformError = MaterializeError::PathTraversal {
            path: "../../etc/passwd".to_string(),
        }
        .into();
        assert!(matches!(err, PlatformError::PathSafety(_)));
        assert!(err.to_string().contains("../../etc/passwd"));
    }
}
