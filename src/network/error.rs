//! Errors raised while building a road graph.

/// Error type for invalid road network input.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Segment length must be strictly positive.
    InvalidLength(f64),
    /// Segment speed must be strictly positive.
    InvalidSpeed(f64),
    /// Congestion level must lie in `1..=10`.
    InvalidCongestion(u8),
    /// A supplied travel time must be strictly positive and finite.
    InvalidTravelTime(f64),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidLength(v) => write!(f, "Invalid segment length: {}", v),
            GraphError::InvalidSpeed(v) => write!(f, "Invalid segment speed: {}", v),
            GraphError::InvalidCongestion(v) => {
                write!(f, "Invalid congestion level: {} (expected 1..=10)", v)
            }
            GraphError::InvalidTravelTime(v) => write!(f, "Invalid travel time: {}", v),
        }
    }
}

impl std::error::Error for GraphError {}
