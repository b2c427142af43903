//! Scenario assembly: routes for every demand, vehicles, congestion tags.

use std::collections::HashMap;

use rand::Rng;
use tracing::info;

use super::{attach_routes, generate_vehicles, PriorityPolicy};
use crate::models::{CandidateRoute, EdgeKey, OdPair, Vehicle};
use crate::network::RoadGraph;
use crate::routing::RouteEnumerator;

/// Candidate routes keyed by origin/destination pair.
pub type RouteTable = HashMap<OdPair, Vec<CandidateRoute>>;

/// Default congestion level from which a segment counts as congested.
pub const DEFAULT_CONGESTION_THRESHOLD: u8 = 7;

/// Vehicles with attached routes plus the congested segments of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Vehicles, indexed by id.
    pub vehicles: Vec<Vehicle>,
    /// Segments whose congestion reaches the threshold.
    pub congested_edges: Vec<EdgeKey>,
}

impl Scenario {
    /// Number of emergency vehicles.
    pub fn num_emergency(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_emergency()).count()
    }
}

/// Returns the segments whose congestion level is at least `threshold`.
///
/// # Examples
///
/// ```
/// use u_corridor::models::EdgeKey;
/// use u_corridor::network::{RoadGraph, RoadSegment};
/// use u_corridor::scenario::identify_congested_edges;
///
/// let mut g = RoadGraph::new();
/// g.add_segment(1, 2, RoadSegment::new(100.0, 30.0, 8).unwrap());
/// g.add_segment(2, 3, RoadSegment::new(100.0, 30.0, 3).unwrap());
/// assert_eq!(identify_congested_edges(&g, 7), vec![EdgeKey::new(1, 2)]);
/// ```
pub fn identify_congested_edges(graph: &RoadGraph, threshold: u8) -> Vec<EdgeKey> {
    graph
        .segments()
        .filter(|(_, _, seg)| seg.congestion() >= threshold)
        .map(|(u, v, _)| EdgeKey::new(u, v))
        .collect()
}

/// Enumerates candidate routes once per distinct origin/destination pair.
pub fn enumerate_routes(
    graph: &RoadGraph,
    od_pairs: &[OdPair],
    enumerator: &RouteEnumerator,
) -> RouteTable {
    let mut table = RouteTable::new();
    for &(origin, destination) in od_pairs {
        table
            .entry((origin, destination))
            .or_insert_with(|| enumerator.enumerate(graph, origin, destination));
    }
    table
}

/// Builds a scenario with the default enumerator, policy and threshold.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_corridor::network::{random_od_pairs, SyntheticNetwork};
/// use u_corridor::scenario::build_scenario;
///
/// let mut rng = StdRng::seed_from_u64(5);
/// let graph = SyntheticNetwork::grid(4, 4).build(&mut rng);
/// let pairs = random_od_pairs(&graph, 4, &mut rng);
/// let scenario = build_scenario(&graph, &pairs, 0.25, &mut rng);
/// assert_eq!(scenario.vehicles.len(), 4);
/// assert!(scenario.vehicles.iter().all(|v| !v.candidate_routes().is_empty()));
/// ```
pub fn build_scenario<R: Rng>(
    graph: &RoadGraph,
    od_pairs: &[OdPair],
    emergency_ratio: f64,
    rng: &mut R,
) -> Scenario {
    ScenarioBuilder::new(graph)
        .with_emergency_ratio(emergency_ratio)
        .build(od_pairs, rng)
}

/// Configurable scenario assembly.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder<'a> {
    graph: &'a RoadGraph,
    enumerator: RouteEnumerator,
    emergency_ratio: f64,
    policy: PriorityPolicy,
    congestion_threshold: u8,
}

impl<'a> ScenarioBuilder<'a> {
    /// Creates a builder over `graph` with default settings.
    pub fn new(graph: &'a RoadGraph) -> Self {
        Self {
            graph,
            enumerator: RouteEnumerator::default(),
            emergency_ratio: 0.2,
            policy: PriorityPolicy::default(),
            congestion_threshold: DEFAULT_CONGESTION_THRESHOLD,
        }
    }

    /// Sets the route enumerator.
    pub fn with_enumerator(mut self, enumerator: RouteEnumerator) -> Self {
        self.enumerator = enumerator;
        self
    }

    /// Sets the fraction of emergency vehicles.
    pub fn with_emergency_ratio(mut self, ratio: f64) -> Self {
        self.emergency_ratio = ratio;
        self
    }

    /// Sets the priority weights.
    pub fn with_policy(mut self, policy: PriorityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the congestion threshold.
    pub fn with_congestion_threshold(mut self, threshold: u8) -> Self {
        self.congestion_threshold = threshold;
        self
    }

    /// Builds the scenario for the given demands.
    pub fn build<R: Rng>(&self, od_pairs: &[OdPair], rng: &mut R) -> Scenario {
        let routes = enumerate_routes(self.graph, od_pairs, &self.enumerator);
        let mut vehicles = generate_vehicles(od_pairs, self.emergency_ratio, &self.policy, rng);
        attach_routes(&mut vehicles, &routes);
        let congested_edges = identify_congested_edges(self.graph, self.congestion_threshold);

        let scenario = Scenario {
            vehicles,
            congested_edges,
        };
        info!(
            vehicles = scenario.vehicles.len(),
            emergency = scenario.num_emergency(),
            congested = scenario.congested_edges.len(),
            "scenario built"
        );
        scenario
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{RoadSegment, SyntheticNetwork};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_congested_threshold_inclusive() {
        let mut g = RoadGraph::new();
        g.add_segment(1, 2, RoadSegment::new(100.0, 30.0, 7).expect("valid"));
        g.add_segment(2, 3, RoadSegment::new(100.0, 30.0, 6).expect("valid"));
        g.add_segment(3, 4, RoadSegment::new(100.0, 30.0, 10).expect("valid"));
        let congested = identify_congested_edges(&g, 7);
        assert_eq!(congested, vec![EdgeKey::new(1, 2), EdgeKey::new(3, 4)]);
        assert!(identify_congested_edges(&RoadGraph::new(), 7).is_empty());
    }

    #[test]
    fn test_enumerate_routes_dedupes_pairs() {
        let mut rng = StdRng::seed_from_u64(4);
        let g = SyntheticNetwork::grid(3, 3).build(&mut rng);
        let table = enumerate_routes(&g, &[(0, 8), (0, 8), (2, 6)], &RouteEnumerator::new(2));
        assert_eq!(table.len(), 2);
        assert_eq!(table[&(0, 8)].len(), 2);
    }

    #[test]
    fn test_builder_settings() {
        let mut rng = StdRng::seed_from_u64(8);
        let g = SyntheticNetwork::grid(3, 3).build(&mut rng);
        let scenario = ScenarioBuilder::new(&g)
            .with_enumerator(RouteEnumerator::new(1))
            .with_emergency_ratio(0.5)
            .with_policy(PriorityPolicy {
                emergency_weight: 50.0,
                regular_weight: 2.0,
            })
            .with_congestion_threshold(1)
            .build(&[(0, 8), (1, 7), (2, 6), (3, 5)], &mut rng);
        assert_eq!(scenario.num_emergency(), 2);
        assert_eq!(scenario.congested_edges.len(), g.edge_count());
        for v in &scenario.vehicles {
            assert_eq!(v.candidate_routes().len(), 1);
            let w = if v.is_emergency() { 50.0 } else { 2.0 };
            assert_eq!(v.priority_weight(), w);
        }
    }
}
