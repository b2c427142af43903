//! Pipeline failures.

use crate::solver::SolverError;

/// Error type for [`Pipeline`](super::Pipeline) operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A configuration value is out of range or unparsable.
    Config(String),
    /// The selected solver failed.
    Solver(SolverError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            PipelineError::Solver(e) => write!(f, "Solve failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Solver(e) => Some(e),
            PipelineError::Config(_) => None,
        }
    }
}

impl From<SolverError> for PipelineError {
    fn from(e: SolverError) -> Self {
        PipelineError::Solver(e)
    }
}
