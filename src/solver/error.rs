//! Solver failures.

use std::time::Duration;

/// Error type for solve attempts.
///
/// Remote failures are reported as they are; no solver silently retries
/// or switches to another backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Too many variables for exhaustive enumeration.
    ProblemTooLarge {
        /// Variables in the model.
        variables: usize,
        /// Largest supported count.
        limit: usize,
    },
    /// The remote service did not answer within the deadline.
    Timeout(Duration),
    /// The remote service rejected the credentials.
    Unauthorized(String),
    /// The remote service refused the job for quota reasons.
    QuotaExceeded(String),
    /// The remote service could not be reached or is not configured.
    Unavailable(String),
    /// The remote service answered with something unusable.
    MalformedResponse(String),
}

impl SolverError {
    /// Returns `true` for failures of the remote backend.
    pub fn is_remote(&self) -> bool {
        !matches!(self, SolverError::ProblemTooLarge { .. })
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::ProblemTooLarge { variables, limit } => write!(
                f,
                "Problem too large for exact solve: {} variables (limit {})",
                variables, limit
            ),
            SolverError::Timeout(d) => write!(f, "Remote solve timed out after {:?}", d),
            SolverError::Unauthorized(msg) => write!(f, "Remote solver unauthorized: {}", msg),
            SolverError::QuotaExceeded(msg) => write!(f, "Remote solver quota exceeded: {}", msg),
            SolverError::Unavailable(msg) => write!(f, "Remote solver unavailable: {}", msg),
            SolverError::MalformedResponse(msg) => {
                write!(f, "Malformed remote solver response: {}", msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}
