//! Emergency/regular partition and green-corridor extraction.

use std::collections::{BTreeSet, HashSet};

use crate::models::{EdgeKey, Vehicle};

/// Splits vehicles into `(emergency, regular)`, preserving order.
pub fn separate_vehicles(vehicles: &[Vehicle]) -> (Vec<&Vehicle>, Vec<&Vehicle>) {
    vehicles.iter().partition(|v| v.is_emergency())
}

/// Uncongested segments on any candidate route of an emergency vehicle.
///
/// These are the segments worth keeping clear so emergency vehicles can
/// pass unobstructed. Regular vehicles are ignored.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, EdgeKey, RouteKind, Vehicle, VehicleType};
/// use u_corridor::priority::emergency_corridor;
///
/// let ambulance = Vehicle::new(0, 1, 3)
///     .with_type(VehicleType::Emergency)
///     .with_routes(vec![CandidateRoute::new(vec![1, 2, 3], Some(1.0), RouteKind::Weighted)]);
/// let corridor = emergency_corridor(&[ambulance], &[EdgeKey::new(2, 3)]);
/// assert_eq!(corridor.into_iter().collect::<Vec<_>>(), vec![EdgeKey::new(1, 2)]);
/// ```
pub fn emergency_corridor(vehicles: &[Vehicle], congested: &[EdgeKey]) -> BTreeSet<EdgeKey> {
    let congested: HashSet<EdgeKey> = congested.iter().copied().collect();
    vehicles
        .iter()
        .filter(|v| v.is_emergency())
        .flat_map(|v| v.candidate_routes().iter())
        .flat_map(|r| r.edge_keys())
        .filter(|key| !congested.contains(key))
        .collect()
}
