//! Builds the priority-aware QUBO from a vehicle list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{QuboModel, VariableIndex};
use crate::models::{EdgeKey, Vehicle};

/// QUBO formulation parameters.
///
/// # Objective
///
/// For each vehicle with route variables `x_0..x_{m-1}`:
///
/// ```text
/// A · (Σ x_i − 1)² − A  =  −A · Σ x_i  +  2A · Σ_{i<j} x_i x_j
/// ```
///
/// with `A = constraint_weight` (default 2): −A on every diagonal and +A
/// for every ordered pair `i ≠ j`. The minimum is reached with exactly one
/// route set; zero or several routes cost more, growing with the square of
/// the deviation.
///
/// For every road segment used by several route variables, each unordered
/// pair of users `(v1, r1, p1)`, `(v2, r2, p2)` adds
/// `congestion_weight · (1/p1 + 1/p2)` to their pair coefficient.
/// Vehicles whose priority weight is not positive and finite are left out
/// of conflict detection.
///
/// Each route variable also gets
/// `route_cost_weight · travel_time / slowest travel_time of the vehicle`
/// on its diagonal (degenerate routes count as the slowest), so the fastest
/// route is preferred when nothing else differs. Keep it below
/// `constraint_weight`; zero disables it.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, RouteKind, Vehicle, VehicleType};
/// use u_corridor::qubo::QuboFormulator;
///
/// let ambulance = Vehicle::new(0, 1, 3)
///     .with_type(VehicleType::Emergency)
///     .with_priority_weight(100.0)
///     .with_routes(vec![CandidateRoute::new(vec![1, 2, 3], Some(2.0), RouteKind::Weighted)]);
/// let car = Vehicle::new(1, 4, 3)
///     .with_routes(vec![CandidateRoute::new(vec![4, 2, 3], Some(2.0), RouteKind::Weighted)]);
///
/// let (model, index) = QuboFormulator::default().formulate(&[ambulance, car]);
/// assert_eq!(index.len(), 2);
/// assert!((model.get(0, 1) - 1.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuboFormulator {
    congestion_weight: f64,
    constraint_weight: f64,
    route_cost_weight: f64,
}

impl Default for QuboFormulator {
    fn default() -> Self {
        Self {
            congestion_weight: 1.0,
            constraint_weight: 2.0,
            route_cost_weight: 0.1,
        }
    }
}

impl QuboFormulator {
    /// Creates a formulator with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scale of the segment-sharing penalty.
    pub fn with_congestion_weight(mut self, weight: f64) -> Self {
        self.congestion_weight = weight;
        self
    }

    /// Sets the strength of the exactly-one-route penalty.
    pub fn with_constraint_weight(mut self, weight: f64) -> Self {
        self.constraint_weight = weight;
        self
    }

    /// Sets the travel-time bias scale.
    pub fn with_route_cost_weight(mut self, weight: f64) -> Self {
        self.route_cost_weight = weight;
        self
    }

    /// Segment-sharing penalty scale.
    pub fn congestion_weight(&self) -> f64 {
        self.congestion_weight
    }

    /// Exactly-one-route penalty strength.
    pub fn constraint_weight(&self) -> f64 {
        self.constraint_weight
    }

    /// Travel-time bias scale.
    pub fn route_cost_weight(&self) -> f64 {
        self.route_cost_weight
    }

    /// Builds the coefficient model and the variable index it is defined over.
    ///
    /// Deterministic: the same vehicles (with the same route order) always
    /// give the same model.
    pub fn formulate(&self, vehicles: &[Vehicle]) -> (QuboModel, VariableIndex) {
        let index = VariableIndex::from_vehicles(vehicles);
        let mut model = QuboModel::new(index.len()).with_labels(index.labels());

        let mut ordered: Vec<&Vehicle> = vehicles.iter().collect();
        ordered.sort_by_key(|v| v.id());

        for vehicle in &ordered {
            let vars: Vec<usize> = (0..vehicle.candidate_routes().len())
                .filter_map(|r| index.position(vehicle.id(), r))
                .collect();
            self.add_one_route_penalty(&mut model, &vars);
            self.add_route_cost_bias(&mut model, vehicle, &vars);
        }

        let conflicts = self.add_conflict_penalties(&mut model, &ordered, &index);

        info!(
            variables = model.num_variables(),
            coefficients = model.len(),
            conflicts,
            "QUBO formulated"
        );
        (model, index)
    }

    fn add_one_route_penalty(&self, model: &mut QuboModel, vars: &[usize]) {
        for &vi in vars {
            model.add(vi, vi, -self.constraint_weight);
            for &vj in vars {
                if vi != vj {
                    model.add(vi, vj, self.constraint_weight);
                }
            }
        }
    }

    fn add_route_cost_bias(&self, model: &mut QuboModel, vehicle: &Vehicle, vars: &[usize]) {
        if self.route_cost_weight == 0.0 {
            return;
        }
        let routes = vehicle.candidate_routes();
        let slowest = routes
            .iter()
            .filter_map(|r| r.travel_time())
            .fold(0.0_f64, f64::max);

        for (route, &var) in routes.iter().zip(vars) {
            let relative = match route.travel_time() {
                Some(t) if slowest > 0.0 => t / slowest,
                Some(_) => 0.0,
                None => 1.0,
            };
            model.add(var, var, self.route_cost_weight * relative);
        }
    }

    /// Returns the number of conflicting pairs penalised.
    fn add_conflict_penalties(
        &self,
        model: &mut QuboModel,
        vehicles: &[&Vehicle],
        index: &VariableIndex,
    ) -> usize {
        // Degenerate routes are placeholders, not roads; they share nothing.
        let mut usage: BTreeMap<EdgeKey, Vec<(usize, f64)>> = BTreeMap::new();
        for vehicle in vehicles {
            let weight = vehicle.priority_weight();
            if !(weight > 0.0 && weight.is_finite()) {
                warn!(
                    vehicle = vehicle.id(),
                    weight, "non-positive priority weight, conflicts ignored"
                );
                continue;
            }
            for (r, route) in vehicle.candidate_routes().iter().enumerate() {
                if route.is_degenerate() {
                    continue;
                }
                let Some(var) = index.position(vehicle.id(), r) else {
                    continue;
                };
                for key in route.edge_keys() {
                    usage
                        .entry(key)
                        .or_default()
                        .push((var, weight));
                }
            }
        }

        let mut conflicts = 0;
        for (edge, users) in &usage {
            if users.len() < 2 {
                continue;
            }
            debug!(?edge, users = users.len(), "shared segment");
            for a in 0..users.len() {
                for b in a + 1..users.len() {
                    let (var1, p1) = users[a];
                    let (var2, p2) = users[b];
                    let penalty = self.congestion_weight * (1.0 / p1 + 1.0 / p2);
                    model.add(var1, var2, penalty);
                    conflicts += 1;
                }
            }
        }
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRoute, RouteKind, VehicleType};

    fn route(nodes: &[u64], travel_time: f64) -> CandidateRoute {
        CandidateRoute::new(nodes.to_vec(), Some(travel_time), RouteKind::Weighted)
    }

    fn bare() -> QuboFormulator {
        QuboFormulator::default().with_route_cost_weight(0.0)
    }

    fn vehicle(id: usize, weight: f64, routes: Vec<CandidateRoute>) -> Vehicle {
        let vehicle_type = if weight > 1.0 {
            VehicleType::Emergency
        } else {
            VehicleType::Regular
        };
        Vehicle::new(id, 0, 0)
            .with_type(vehicle_type)
            .with_priority_weight(weight)
            .with_routes(routes)
    }

    #[test]
    fn test_one_route_penalty() {
        let v = vehicle(0, 1.0, vec![route(&[1, 2], 1.0), route(&[1, 3], 1.0), route(&[1, 4], 1.0)]);
        let (model, index) = bare().formulate(&[v]);
        assert_eq!(index.len(), 3);
        for i in 0..3 {
            assert_eq!(model.linear(i), -2.0);
        }
        // +2 for (i, j) and +2 for (j, i)
        assert_eq!(model.get(0, 1), 4.0);
        assert_eq!(model.get(1, 2), 4.0);
        assert_eq!(model.get(0, 2), 4.0);

        assert_eq!(model.energy(&[0, 0, 0]), 0.0);
        assert_eq!(model.energy(&[0, 1, 0]), -2.0);
        assert_eq!(model.energy(&[1, 1, 0]), 0.0);
        assert_eq!(model.energy(&[1, 1, 1]), 6.0);
    }

    #[test]
    fn test_mixed_priority_conflict() {
        let vehicles = vec![
            vehicle(0, 100.0, vec![route(&[1, 2, 3], 2.0)]),
            vehicle(1, 1.0, vec![route(&[4, 2, 3], 2.0)]),
        ];
        let (model, _) = bare().formulate(&vehicles);
        assert!((model.get(0, 1) - 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_regular_conflict_costs_more() {
        let regular = vec![
            vehicle(0, 1.0, vec![route(&[1, 2, 3], 2.0)]),
            vehicle(1, 1.0, vec![route(&[4, 2, 3], 2.0)]),
        ];
        let emergency = vec![
            vehicle(0, 100.0, vec![route(&[1, 2, 3], 2.0)]),
            vehicle(1, 100.0, vec![route(&[4, 2, 3], 2.0)]),
        ];
        let (reg, _) = bare().formulate(&regular);
        let (emg, _) = bare().formulate(&emergency);
        assert_eq!(reg.get(0, 1), 2.0);
        assert!((emg.get(0, 1) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_conflict_matching_is_undirected() {
        let vehicles = vec![
            vehicle(0, 1.0, vec![route(&[1, 2], 1.0)]),
            vehicle(1, 1.0, vec![route(&[2, 1], 1.0)]),
        ];
        let (model, _) = bare().formulate(&vehicles);
        assert_eq!(model.get(0, 1), 2.0);
    }

    #[test]
    fn test_conflicts_accumulate_per_segment() {
        let vehicles = vec![
            vehicle(0, 1.0, vec![route(&[1, 2, 3, 4], 3.0)]),
            vehicle(1, 1.0, vec![route(&[1, 2, 3, 5], 3.0)]),
        ];
        let (model, _) = bare().formulate(&vehicles);
        // two shared segments, 2.0 each
        assert_eq!(model.get(0, 1), 4.0);
    }

    #[test]
    fn test_congestion_weight_scales() {
        let vehicles = vec![
            vehicle(0, 1.0, vec![route(&[1, 2], 1.0)]),
            vehicle(1, 1.0, vec![route(&[1, 2], 1.0)]),
        ];
        let (model, _) = bare().with_congestion_weight(0.5).formulate(&vehicles);
        assert_eq!(model.get(0, 1), 1.0);
    }

    #[test]
    fn test_degenerate_routes_never_conflict() {
        let vehicles = vec![
            vehicle(0, 1.0, vec![CandidateRoute::degenerate(1, 2)]),
            vehicle(1, 1.0, vec![CandidateRoute::degenerate(1, 2)]),
        ];
        let (model, _) = bare().formulate(&vehicles);
        assert_eq!(model.get(0, 1), 0.0);
    }

    #[test]
    fn test_route_cost_bias() {
        let v = vehicle(0, 1.0, vec![route(&[1, 2], 1.0), route(&[1, 3, 2], 2.0), CandidateRoute::degenerate(1, 2)]);
        let (model, _) = QuboFormulator::default().formulate(&[v]);
        assert!((model.linear(0) - (-2.0 + 0.05)).abs() < 1e-12);
        assert!((model.linear(1) - (-2.0 + 0.1)).abs() < 1e-12);
        assert!((model.linear(2) - (-2.0 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_formulate_idempotent() {
        let vehicles = vec![
            vehicle(0, 100.0, vec![route(&[1, 2, 3], 2.0), route(&[1, 4, 3], 3.0)]),
            vehicle(1, 1.0, vec![route(&[5, 2, 3], 2.0), route(&[5, 4, 3], 2.5)]),
        ];
        let f = QuboFormulator::default();
        assert_eq!(f.formulate(&vehicles), f.formulate(&vehicles));
    }

    #[test]
    fn test_empty_vehicles() {
        let (model, index) = QuboFormulator::default().formulate(&[]);
        assert!(model.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_invalid_priority_weight_skips_conflicts() {
        let vehicles = vec![
            vehicle(0, 0.0, vec![route(&[1, 2, 3], 1.0), route(&[1, 4, 3], 2.0)]),
            vehicle(1, 1.0, vec![route(&[1, 2, 3], 1.0), route(&[1, 5, 3], 2.0)]),
        ];
        let (model, _) = bare().formulate(&vehicles);
        assert!(model.iter().all(|(_, _, q)| q.is_finite()));
        assert_eq!(model.get(0, 2), 0.0);
        assert!(model.energy(&[1, 0, 1, 0]).is_finite());
    }
}
