//! Route selection and violation types.

use serde::{Deserialize, Serialize};

use super::CandidateRoute;

/// A type of irregularity in a route selection.
///
/// None of these abort a solve: the affected vehicle is simply reported
/// as unassigned, or assigned by last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// The vehicle has no candidate routes at all.
    NoCandidates {
        /// Vehicle ID.
        vehicle_id: usize,
    },
    /// The sample set none of the vehicle's route variables.
    NoRouteSelected {
        /// Vehicle ID.
        vehicle_id: usize,
    },
    /// The sample set more than one of the vehicle's route variables.
    MultipleRoutesSelected {
        /// Vehicle ID.
        vehicle_id: usize,
        /// Number of variables set.
        count: usize,
    },
}

/// An irregularity found while building a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// The vehicle this violation concerns.
    pub fn vehicle_id(&self) -> usize {
        match self.kind {
            ViolationType::NoCandidates { vehicle_id }
            | ViolationType::NoRouteSelected { vehicle_id }
            | ViolationType::MultipleRoutesSelected { vehicle_id, .. } => vehicle_id,
        }
    }
}

/// The chosen route of every vehicle in a scenario.
///
/// Holds exactly one slot per vehicle id `0..N`; a slot is `None` when the
/// vehicle ended up unassigned. Both the QUBO decoder and the priority
/// ranking heuristic produce this shape.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, RouteSelection};
///
/// let mut sel = RouteSelection::new(2);
/// sel.assign(1, CandidateRoute::degenerate(4, 5));
/// assert_eq!(sel.len(), 2);
/// assert!(sel.get(0).is_none());
/// assert_eq!(sel.num_assigned(), 1);
/// assert_eq!(sel.unassigned(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    assignments: Vec<Option<CandidateRoute>>,
    violations: Vec<Violation>,
}

impl RouteSelection {
    /// Creates a selection with every vehicle unassigned.
    pub fn new(num_vehicles: usize) -> Self {
        Self {
            assignments: vec![None; num_vehicles],
            violations: Vec::new(),
        }
    }

    /// Assigns `route` to a vehicle, replacing any earlier assignment.
    ///
    /// Ids outside `0..len()` are ignored.
    pub fn assign(&mut self, vehicle_id: usize, route: CandidateRoute) {
        if let Some(slot) = self.assignments.get_mut(vehicle_id) {
            *slot = Some(route);
        }
    }

    /// Records a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Route chosen for a vehicle, if any.
    pub fn get(&self, vehicle_id: usize) -> Option<&CandidateRoute> {
        self.assignments.get(vehicle_id).and_then(Option::as_ref)
    }

    /// Number of vehicle slots.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` if the selection covers no vehicles.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates `(vehicle_id, route)` over every vehicle.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&CandidateRoute>)> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(vid, r)| (vid, r.as_ref()))
    }

    /// Number of vehicles with a route.
    pub fn num_assigned(&self) -> usize {
        self.assignments.iter().filter(|r| r.is_some()).count()
    }

    /// IDs of vehicles without a route.
    pub fn unassigned(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, r)| r.is_none())
            .map(|(vid, _)| vid)
            .collect()
    }

    /// Irregularities recorded while building this selection.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns `true` if every vehicle has a route and nothing was violated.
    pub fn is_complete(&self) -> bool {
        self.violations.is_empty() && self.assignments.iter().all(Option::is_some)
    }
}
