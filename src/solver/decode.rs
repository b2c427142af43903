//! Mapping a binary sample back to per-vehicle routes.

use tracing::warn;

use super::Sample;
use crate::models::{RouteSelection, Vehicle, Violation, ViolationType};
use crate::qubo::VariableIndex;

/// Builds a [`RouteSelection`] from `sample`.
///
/// `index` must be the one produced alongside the model that was solved.
/// Variables are visited in index order; when several routes of one
/// vehicle are set, the last one visited is kept and a
/// [`ViolationType::MultipleRoutesSelected`] is recorded. Vehicles with
/// no selected route stay unassigned with [`ViolationType::NoRouteSelected`]
/// (or [`ViolationType::NoCandidates`] if they had nothing to choose from).
///
/// Vehicle ids are positions in `vehicles`.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, RouteKind, Vehicle};
/// use u_corridor::qubo::{QuboFormulator, QuboModel};
/// use u_corridor::solver::{decode, Sample};
///
/// let r = |n: &[u64]| CandidateRoute::new(n.to_vec(), Some(1.0), RouteKind::Weighted);
/// let vehicles = vec![Vehicle::new(0, 1, 3).with_routes(vec![r(&[1, 2, 3]), r(&[1, 4, 3])])];
/// let (model, index) = QuboFormulator::new().formulate(&vehicles);
/// let selection = decode(&Sample::new(vec![0, 1], &model), &index, &vehicles);
/// assert_eq!(selection.get(0).unwrap().nodes(), &[1, 4, 3]);
/// assert!(selection.is_complete());
/// ```
pub fn decode(sample: &Sample, index: &VariableIndex, vehicles: &[Vehicle]) -> RouteSelection {
    let mut selection = RouteSelection::new(vehicles.len());
    let mut selected = vec![0usize; vehicles.len()];

    for (var, (vehicle_id, route_index)) in index.iter() {
        if sample.get(var) != 1 {
            continue;
        }
        let Some(route) = vehicles
            .get(vehicle_id)
            .and_then(|v| v.candidate_routes().get(route_index))
        else {
            continue;
        };
        selection.assign(vehicle_id, route.clone());
        selected[vehicle_id] += 1;
    }

    for (vehicle_id, vehicle) in vehicles.iter().enumerate() {
        let kind = if vehicle.candidate_routes().is_empty() {
            ViolationType::NoCandidates { vehicle_id }
        } else {
            match selected[vehicle_id] {
                0 => ViolationType::NoRouteSelected { vehicle_id },
                1 => continue,
                count => ViolationType::MultipleRoutesSelected { vehicle_id, count },
            }
        };
        selection.add_violation(Violation::new(kind));
    }

    if !selection.violations().is_empty() {
        warn!(
            violations = selection.violations().len(),
            unassigned = selection.unassigned().len(),
            "decoded selection violates the one-route constraint"
        );
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRoute, RouteKind};
    use crate::qubo::QuboFormulator;

    fn route(nodes: &[u64]) -> CandidateRoute {
        CandidateRoute::new(nodes.to_vec(), Some(1.0), RouteKind::Weighted)
    }

    fn vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle::new(0, 1, 3).with_routes(vec![route(&[1, 2, 3]), route(&[1, 4, 3]), route(&[1, 5, 3])]),
            Vehicle::new(1, 6, 8).with_routes(vec![route(&[6, 7, 8])]),
        ]
    }

    #[test]
    fn test_decode_last_write_wins() {
        let vs = vehicles();
        let (model, index) = QuboFormulator::new().formulate(&vs);
        let sel = decode(&Sample::new(vec![1, 0, 1, 1], &model), &index, &vs);
        assert_eq!(sel.get(0).unwrap().nodes(), &[1, 5, 3]);
        assert_eq!(sel.get(1).unwrap().nodes(), &[6, 7, 8]);
        assert_eq!(
            sel.violations()[0].kind,
            ViolationType::MultipleRoutesSelected {
                vehicle_id: 0,
                count: 2
            }
        );
    }

    #[test]
    fn test_decode_missing_selection() {
        let vs = vehicles();
        let (model, index) = QuboFormulator::new().formulate(&vs);
        let sel = decode(&Sample::new(vec![0, 1, 0, 0], &model), &index, &vs);
        assert_eq!(sel.unassigned(), vec![1]);
        assert_eq!(sel.violations().len(), 1);
        assert_eq!(sel.violations()[0].vehicle_id(), 1);
        assert!(!sel.is_complete());
    }

    #[test]
    fn test_decode_vehicle_without_candidates() {
        let vs = vec![Vehicle::new(0, 1, 2)];
        let (model, index) = QuboFormulator::new().formulate(&vs);
        let sel = decode(&Sample::new(Vec::new(), &model), &index, &vs);
        assert!(sel.get(0).is_none());
        assert_eq!(
            sel.violations()[0].kind,
            ViolationType::NoCandidates { vehicle_id: 0 }
        );
    }

    #[test]
    fn test_decode_complete() {
        let vs = vehicles();
        let (model, index) = QuboFormulator::new().formulate(&vs);
        let sel = decode(&Sample::new(vec![1, 0, 0, 1], &model), &index, &vs);
        assert!(sel.is_complete());
        assert_eq!(sel.num_assigned(), 2);
    }
}
