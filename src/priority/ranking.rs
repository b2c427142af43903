//! Route scoring and per-vehicle selection.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{CandidateRoute, EdgeKey, RouteSelection, Vehicle, Violation, ViolationType};

/// A candidate route with its priority score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRoute<'a> {
    /// Position in the vehicle's candidate list.
    pub route_index: usize,
    /// The route itself.
    pub route: &'a CandidateRoute,
    /// `priority_weight / (1 + congested segments on the route)`.
    pub score: f64,
}

/// Scores a route: `priority_weight / (1 + overlap)`, where `overlap` counts
/// the route's segments found in `congested` (direction ignored).
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use u_corridor::models::{CandidateRoute, EdgeKey, RouteKind};
/// use u_corridor::priority::route_priority;
///
/// let route = CandidateRoute::new(vec![1, 2, 3], Some(2.0), RouteKind::Weighted);
/// let congested: HashSet<EdgeKey> = [EdgeKey::new(3, 2)].into_iter().collect();
/// assert_eq!(route_priority(&route, &congested, 100.0), 50.0);
/// ```
pub fn route_priority(route: &CandidateRoute, congested: &HashSet<EdgeKey>, priority_weight: f64) -> f64 {
    let overlap = route
        .edge_keys()
        .iter()
        .filter(|key| congested.contains(key))
        .count();
    priority_weight / (1.0 + overlap as f64)
}

/// Ranks a vehicle's candidate routes by descending score.
///
/// The sort is stable: equal scores keep their candidate order.
pub fn rank_routes<'a>(vehicle: &'a Vehicle, congested: &[EdgeKey]) -> Vec<RankedRoute<'a>> {
    let congested: HashSet<EdgeKey> = congested.iter().copied().collect();
    rank_with(vehicle, &congested)
}

fn rank_with<'a>(vehicle: &'a Vehicle, congested: &HashSet<EdgeKey>) -> Vec<RankedRoute<'a>> {
    let mut ranked: Vec<RankedRoute<'a>> = vehicle
        .candidate_routes()
        .iter()
        .enumerate()
        .map(|(route_index, route)| RankedRoute {
            route_index,
            route,
            score: route_priority(route, congested, vehicle.priority_weight()),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Picks every vehicle's top-ranked route.
///
/// Vehicles without candidates stay unassigned and are reported as
/// [`ViolationType::NoCandidates`].
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, EdgeKey, RouteKind, Vehicle};
/// use u_corridor::priority::select_best;
///
/// let direct = CandidateRoute::new(vec![1, 2], Some(1.0), RouteKind::Weighted);
/// let detour = CandidateRoute::new(vec![1, 3, 2], Some(2.0), RouteKind::Weighted);
/// let vehicles = vec![
///     Vehicle::new(0, 1, 2).with_routes(vec![direct, detour.clone()]),
///     Vehicle::new(1, 5, 6),
/// ];
/// let selection = select_best(&vehicles, &[EdgeKey::new(1, 2)]);
/// assert_eq!(selection.get(0), Some(&detour));
/// assert!(selection.get(1).is_none());
/// ```
pub fn select_best(vehicles: &[Vehicle], congested: &[EdgeKey]) -> RouteSelection {
    let congested: HashSet<EdgeKey> = congested.iter().copied().collect();
    let mut selection = RouteSelection::new(vehicles.len());

    for vehicle in vehicles {
        match rank_with(vehicle, &congested).into_iter().next() {
            Some(best) => selection.assign(vehicle.id(), best.route.clone()),
            None => selection.add_violation(Violation::new(ViolationType::NoCandidates {
                vehicle_id: vehicle.id(),
            })),
        }
    }

    debug!(
        assigned = selection.num_assigned(),
        vehicles = vehicles.len(),
        "priority ranking selection"
    );
    selection
}
