//! Road segment attributes and the travel-time model.

use serde::{Deserialize, Serialize};

use super::GraphError;

/// Lowest congestion level.
pub const MIN_CONGESTION: u8 = 1;
/// Highest congestion level.
pub const MAX_CONGESTION: u8 = 10;

/// Attributes of a single road segment.
///
/// Travel time is in minutes:
///
/// ```text
/// travel_time = (length / 1000 / speed) * 60 * (1 + congestion / 20)
/// ```
///
/// It is strictly positive and increases with both length and congestion.
///
/// # Examples
///
/// ```
/// use u_corridor::network::RoadSegment;
///
/// // 1 km at 60 km/h is one minute free-flow; level 10 adds 50%.
/// let seg = RoadSegment::new(1000.0, 60.0, 10).unwrap();
/// assert!((seg.travel_time() - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    length: f64,
    speed: f64,
    congestion: u8,
    travel_time: f64,
}

impl RoadSegment {
    /// Creates a segment and derives its travel time.
    ///
    /// # Arguments
    ///
    /// * `length` — meters, > 0
    /// * `speed` — km/h, > 0
    /// * `congestion` — level in `1..=10`
    pub fn new(length: f64, speed: f64, congestion: u8) -> Result<Self, GraphError> {
        validate(length, speed, congestion)?;
        Ok(Self {
            length,
            speed,
            congestion,
            travel_time: travel_time(length, speed, congestion),
        })
    }

    /// Creates a segment whose travel time was computed by the provider.
    pub fn with_travel_time(
        length: f64,
        speed: f64,
        congestion: u8,
        travel_time: f64,
    ) -> Result<Self, GraphError> {
        validate(length, speed, congestion)?;
        if !(travel_time.is_finite() && travel_time > 0.0) {
            return Err(GraphError::InvalidTravelTime(travel_time));
        }
        Ok(Self {
            length,
            speed,
            congestion,
            travel_time,
        })
    }

    /// Builds a segment from attributes already known to be in range.
    pub(super) fn from_valid(length: f64, speed: f64, congestion: u8) -> Self {
        debug_assert!(validate(length, speed, congestion).is_ok());
        Self {
            length,
            speed,
            congestion,
            travel_time: travel_time(length, speed, congestion),
        }
    }

    /// Length in meters.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Speed in km/h.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Congestion level, `1..=10`.
    pub fn congestion(&self) -> u8 {
        self.congestion
    }

    /// Travel time in minutes.
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }
}

fn validate(length: f64, speed: f64, congestion: u8) -> Result<(), GraphError> {
    if !(length.is_finite() && length > 0.0) {
        return Err(GraphError::InvalidLength(length));
    }
    if !(speed.is_finite() && speed > 0.0) {
        return Err(GraphError::InvalidSpeed(speed));
    }
    if !(MIN_CONGESTION..=MAX_CONGESTION).contains(&congestion) {
        return Err(GraphError::InvalidCongestion(congestion));
    }
    Ok(())
}

fn travel_time(length: f64, speed: f64, congestion: u8) -> f64 {
    let base = (length / 1000.0 / speed) * 60.0;
    base * (1.0 + f64::from(congestion) / 20.0)
}
