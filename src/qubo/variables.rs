//! Decision variable index.

use std::collections::HashMap;

use crate::models::Vehicle;

/// `(vehicle_id, route_index)` of a decision variable.
pub type VarKey = (usize, usize);

/// Bijection between variable positions and `(vehicle_id, route_index)`.
///
/// Variables are numbered in vehicle-id order, then route-index order.
/// The same index must be handed, unchanged, to the decoder.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, Vehicle};
/// use u_corridor::qubo::VariableIndex;
///
/// let vehicles = vec![
///     Vehicle::new(0, 1, 2).with_routes(vec![CandidateRoute::degenerate(1, 2); 2]),
///     Vehicle::new(1, 3, 4).with_routes(vec![CandidateRoute::degenerate(3, 4)]),
/// ];
/// let index = VariableIndex::from_vehicles(&vehicles);
/// assert_eq!(index.len(), 3);
/// assert_eq!(index.key(2), Some((1, 0)));
/// assert_eq!(index.position(0, 1), Some(1));
/// assert_eq!(index.label(1).as_deref(), Some("x_0_1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableIndex {
    keys: Vec<VarKey>,
    positions: HashMap<VarKey, usize>,
}

impl VariableIndex {
    /// Creates a variable for every candidate route of every vehicle.
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        let mut ordered: Vec<&Vehicle> = vehicles.iter().collect();
        ordered.sort_by_key(|v| v.id());

        let mut index = Self::default();
        for vehicle in ordered {
            for route_index in 0..vehicle.candidate_routes().len() {
                index.push((vehicle.id(), route_index));
            }
        }
        index
    }

    fn push(&mut self, key: VarKey) {
        self.positions.insert(key, self.keys.len());
        self.keys.push(key);
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(vehicle_id, route_index)` of variable `var`.
    pub fn key(&self, var: usize) -> Option<VarKey> {
        self.keys.get(var).copied()
    }

    /// Position of the variable for a vehicle's route.
    pub fn position(&self, vehicle_id: usize, route_index: usize) -> Option<usize> {
        self.positions.get(&(vehicle_id, route_index)).copied()
    }

    /// Human-readable name `x_{vehicle}_{route}`.
    pub fn label(&self, var: usize) -> Option<String> {
        self.key(var).map(|(vid, r)| format!("x_{}_{}", vid, r))
    }

    /// All labels in variable order.
    pub fn labels(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|(vid, r)| format!("x_{}_{}", vid, r))
            .collect()
    }

    /// Iterates `(position, (vehicle_id, route_index))` in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, VarKey)> + '_ {
        self.keys.iter().copied().enumerate()
    }
}
