//! Summary of a route selection.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{CandidateRoute, EdgeKey, RouteSelection, Vehicle};

/// Emergency/regular breakdown of a [`RouteSelection`].
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, RouteKind, RouteSelection, Vehicle, VehicleType};
/// use u_corridor::pipeline::SelectionReport;
///
/// let r = CandidateRoute::new(vec![1, 2, 3], Some(2.5), RouteKind::Weighted);
/// let vehicles = vec![
///     Vehicle::new(0, 1, 3).with_type(VehicleType::Emergency).with_routes(vec![r.clone()]),
///     Vehicle::new(1, 4, 5),
/// ];
/// let mut selection = RouteSelection::new(2);
/// selection.assign(0, r);
///
/// let report = SelectionReport::new(&vehicles, &selection);
/// assert_eq!(report.emergency.len(), 1);
/// assert_eq!(report.unassigned, vec![1]);
/// assert_eq!(report.corridor_edges.len(), 2);
/// assert_eq!(report.total_travel_time, 2.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    /// `(vehicle_id, route)` of assigned emergency vehicles.
    pub emergency: Vec<(usize, CandidateRoute)>,
    /// `(vehicle_id, route)` of assigned regular vehicles.
    pub regular: Vec<(usize, CandidateRoute)>,
    /// Vehicles left without a route.
    pub unassigned: Vec<usize>,
    /// Segments on the routes chosen for emergency vehicles.
    pub corridor_edges: BTreeSet<EdgeKey>,
    /// Segments used by more than one assigned vehicle.
    pub shared_edges: BTreeSet<EdgeKey>,
    /// Sum of known travel times over assigned routes, in minutes.
    pub total_travel_time: f64,
    /// Number of recorded violations.
    pub violations: usize,
}

impl SelectionReport {
    /// Builds the report; vehicle ids are positions in `vehicles`.
    pub fn new(vehicles: &[Vehicle], selection: &RouteSelection) -> Self {
        let mut emergency = Vec::new();
        let mut regular = Vec::new();
        let mut unassigned = Vec::new();
        let mut corridor_edges = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut shared_edges = BTreeSet::new();
        let mut total_travel_time = 0.0;

        for (vehicle_id, route) in selection.iter() {
            let Some(route) = route else {
                unassigned.push(vehicle_id);
                continue;
            };
            let is_emergency = vehicles.get(vehicle_id).is_some_and(|v| v.is_emergency());
            if !route.is_degenerate() {
                // Each vehicle counts once per segment.
                let keys: BTreeSet<EdgeKey> = route.edge_keys().into_iter().collect();
                for key in keys {
                    if !seen.insert(key) {
                        shared_edges.insert(key);
                    }
                    if is_emergency {
                        corridor_edges.insert(key);
                    }
                }
            }
            total_travel_time += route.travel_time().unwrap_or(0.0);
            if is_emergency {
                emergency.push((vehicle_id, route.clone()));
            } else {
                regular.push((vehicle_id, route.clone()));
            }
        }

        Self {
            emergency,
            regular,
            unassigned,
            corridor_edges,
            shared_edges,
            total_travel_time,
            violations: selection.violations().len(),
        }
    }

    /// Number of assigned vehicles.
    pub fn num_assigned(&self) -> usize {
        self.emergency.len() + self.regular.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteKind, VehicleType};

    fn route(nodes: &[u64]) -> CandidateRoute {
        CandidateRoute::new(nodes.to_vec(), Some(1.0), RouteKind::Weighted)
    }

    #[test]
    fn test_report_shared_edges() {
        let vehicles = vec![
            Vehicle::new(0, 1, 3).with_type(VehicleType::Emergency),
            Vehicle::new(1, 1, 4),
            Vehicle::new(2, 5, 6),
        ];
        let mut sel = RouteSelection::new(3);
        sel.assign(0, route(&[1, 2, 3]));
        sel.assign(1, route(&[4, 2, 1]));
        sel.assign(2, CandidateRoute::degenerate(5, 6));

        let report = SelectionReport::new(&vehicles, &sel);
        assert_eq!(report.num_assigned(), 3);
        assert_eq!(report.regular.len(), 2);
        assert_eq!(
            report.shared_edges.into_iter().collect::<Vec<_>>(),
            vec![EdgeKey::new(1, 2)]
        );
        assert_eq!(
            report.corridor_edges.into_iter().collect::<Vec<_>>(),
            vec![EdgeKey::new(1, 2), EdgeKey::new(2, 3)]
        );
        assert_eq!(report.total_travel_time, 2.0);
    }

    #[test]
    fn test_report_serializes() {
        let sel = RouteSelection::new(1);
        let report = SelectionReport::new(&[Vehicle::new(0, 1, 2)], &sel);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["unassigned"], serde_json::json!([0]));
    }
}
