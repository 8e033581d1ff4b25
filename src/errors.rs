//! Error types for engine registry operations
//!
//! Only registry/lifecycle operations can fail. The statistical functions
//! are total over their documented input domain: degenerate input produces
//! neutral sentinel values, never an error.

/// Errors from experiment registry and lifecycle operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("Experiment already exists: {0}")]
    ExperimentAlreadyExists(String),

    #[error("Experiment is not running: {0}")]
    ExperimentNotRunning(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::ExperimentNotFound("exp-1".to_string());
        assert!(err.to_string().contains("exp-1"));

        let err = EngineError::ExperimentNotRunning("exp-2".to_string());
        assert!(err.to_string().contains("not running"));
    }
}
