//! Vehicle type with demand, priority, and candidate routes.

use serde::{Deserialize, Serialize};

use super::{CandidateRoute, NodeId, OdPair};

/// Regular traffic or an emergency vehicle entitled to a green corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Ordinary traffic.
    Regular,
    /// Ambulance, fire engine, police.
    Emergency,
}

/// A vehicle travelling from an origin to a destination.
///
/// Everything except the candidate routes is fixed at creation; routes are
/// attached once, after enumeration.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{Vehicle, VehicleType};
///
/// let v = Vehicle::new(0, 10, 20)
///     .with_type(VehicleType::Emergency)
///     .with_priority_weight(100.0);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.od_pair(), (10, 20));
/// assert!(v.is_emergency());
/// assert!(v.candidate_routes().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    origin: NodeId,
    destination: NodeId,
    vehicle_type: VehicleType,
    priority_weight: f64,
    candidate_routes: Vec<CandidateRoute>,
}

impl Vehicle {
    /// Creates a regular vehicle with priority weight 1 and no routes.
    pub fn new(id: usize, origin: NodeId, destination: NodeId) -> Self {
        Self {
            id,
            origin,
            destination,
            vehicle_type: VehicleType::Regular,
            priority_weight: 1.0,
            candidate_routes: Vec::new(),
        }
    }

    /// Sets the vehicle type.
    pub fn with_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = vehicle_type;
        self
    }

    /// Sets the priority weight.
    pub fn with_priority_weight(mut self, weight: f64) -> Self {
        self.priority_weight = weight;
        self
    }

    /// Sets the candidate routes.
    pub fn with_routes(mut self, routes: Vec<CandidateRoute>) -> Self {
        self.candidate_routes = routes;
        self
    }

    /// Vehicle ID (position in the scenario's vehicle list).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Origin node.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Destination node.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// `(origin, destination)`.
    pub fn od_pair(&self) -> OdPair {
        (self.origin, self.destination)
    }

    /// Regular or emergency.
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Returns `true` for emergency vehicles.
    pub fn is_emergency(&self) -> bool {
        self.vehicle_type == VehicleType::Emergency
    }

    /// Priority weight; emergency vehicles carry a much larger weight.
    pub fn priority_weight(&self) -> f64 {
        self.priority_weight
    }

    /// Candidate routes, cheapest first. May be empty.
    pub fn candidate_routes(&self) -> &[CandidateRoute] {
        &self.candidate_routes
    }

    pub(crate) fn set_candidate_routes(&mut self, routes: Vec<CandidateRoute>) {
        self.candidate_routes = routes;
    }
}
