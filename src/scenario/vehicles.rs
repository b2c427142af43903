//! Vehicle generation and route attachment.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CandidateRoute, OdPair, Vehicle, VehicleType};

/// Priority weights per vehicle type.
///
/// Only the ratio matters to the optimisation; the default is 100:1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityPolicy {
    /// Weight of emergency vehicles.
    pub emergency_weight: f64,
    /// Weight of regular vehicles.
    pub regular_weight: f64,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            emergency_weight: 100.0,
            regular_weight: 1.0,
        }
    }
}

impl PriorityPolicy {
    /// Weight for the given vehicle type.
    pub fn weight_of(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::Emergency => self.emergency_weight,
            VehicleType::Regular => self.regular_weight,
        }
    }
}

/// Creates one vehicle per origin/destination pair.
///
/// Vehicle `i` serves `od_pairs[i]`. `max(1, floor(n * emergency_ratio))`
/// of them, sampled without replacement, are emergency vehicles (capped at
/// `n`; an empty demand list yields no vehicles).
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_corridor::scenario::{generate_vehicles, PriorityPolicy};
///
/// let pairs = vec![(0, 1), (2, 3), (4, 5), (6, 7), (8, 9)];
/// let mut rng = StdRng::seed_from_u64(42);
/// let vehicles = generate_vehicles(&pairs, 0.2, &PriorityPolicy::default(), &mut rng);
/// assert_eq!(vehicles.len(), 5);
/// assert_eq!(vehicles.iter().filter(|v| v.is_emergency()).count(), 1);
/// ```
pub fn generate_vehicles<R: Rng>(
    od_pairs: &[OdPair],
    emergency_ratio: f64,
    policy: &PriorityPolicy,
    rng: &mut R,
) -> Vec<Vehicle> {
    let n = od_pairs.len();
    if n == 0 {
        return Vec::new();
    }

    let num_emergency = ((n as f64 * emergency_ratio).floor() as usize).clamp(1, n);
    let mut emergency = vec![false; n];
    for idx in rand::seq::index::sample(rng, n, num_emergency) {
        emergency[idx] = true;
    }
    debug!(vehicles = n, emergency = num_emergency, "generated vehicles");

    od_pairs
        .iter()
        .enumerate()
        .map(|(id, &(origin, destination))| {
            let vehicle_type = if emergency[id] {
                VehicleType::Emergency
            } else {
                VehicleType::Regular
            };
            Vehicle::new(id, origin, destination)
                .with_type(vehicle_type)
                .with_priority_weight(policy.weight_of(vehicle_type))
        })
        .collect()
}

/// Attaches each vehicle's candidate routes from a table keyed by OD pair.
///
/// Vehicles whose pair is missing get an empty candidate list.
pub fn attach_routes(vehicles: &mut [Vehicle], routes: &HashMap<OdPair, Vec<CandidateRoute>>) {
    for vehicle in vehicles.iter_mut() {
        let candidates = routes.get(&vehicle.od_pair()).cloned().unwrap_or_default();
        vehicle.set_candidate_routes(candidates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pairs(n: u64) -> Vec<OdPair> {
        (0..n).map(|i| (i, i + 100)).collect()
    }

    #[test]
    fn test_emergency_count() {
        let policy = PriorityPolicy::default();
        let mut rng = StdRng::seed_from_u64(1);
        let v = generate_vehicles(&pairs(10), 0.3, &policy, &mut rng);
        assert_eq!(v.iter().filter(|v| v.is_emergency()).count(), 3);

        // floor(3 * 0.1) == 0, but at least one emergency vehicle exists
        let v = generate_vehicles(&pairs(3), 0.1, &policy, &mut rng);
        assert_eq!(v.iter().filter(|v| v.is_emergency()).count(), 1);
    }

    #[test]
    fn test_weights_and_ids() {
        let policy = PriorityPolicy::default();
        let mut rng = StdRng::seed_from_u64(2);
        let v = generate_vehicles(&pairs(6), 0.5, &policy, &mut rng);
        for (i, vehicle) in v.iter().enumerate() {
            assert_eq!(vehicle.id(), i);
            assert_eq!(vehicle.od_pair(), (i as u64, i as u64 + 100));
            let expected = if vehicle.is_emergency() { 100.0 } else { 1.0 };
            assert_eq!(vehicle.priority_weight(), expected);
        }
    }

    #[test]
    fn test_seeded_reproducible() {
        let policy = PriorityPolicy::default();
        let a = generate_vehicles(&pairs(20), 0.25, &policy, &mut StdRng::seed_from_u64(9));
        let b = generate_vehicles(&pairs(20), 0.25, &policy, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_demand() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_vehicles(&[], 0.5, &PriorityPolicy::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_attach_routes() {
        let mut vehicles = vec![Vehicle::new(0, 1, 2), Vehicle::new(1, 5, 6)];
        let mut table = HashMap::new();
        table.insert((1, 2), vec![CandidateRoute::degenerate(1, 2)]);
        attach_routes(&mut vehicles, &table);
        assert_eq!(vehicles[0].candidate_routes().len(), 1);
        assert!(vehicles[1].candidate_routes().is_empty());
    }
}
