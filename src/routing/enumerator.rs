//! Candidate route enumeration with a fallback ladder.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{fewest_hops_path, k_shortest_paths};
use crate::models::{CandidateRoute, NodeId, RouteKind};
use crate::network::RoadGraph;

/// Produces up to `k` candidate routes per origin/destination pair.
///
/// Never fails and never returns an empty list:
///
/// 1. `origin == destination` → the single-node route.
/// 2. Yen's k shortest simple paths by travel time.
/// 3. No weighted path → the fewest-hops path.
/// 4. Still nothing → the degenerate route `[origin, destination]`, marked
///    [`RouteKind::Degenerate`] because the segment may not exist.
///
/// # Examples
///
/// ```
/// use u_corridor::models::RouteKind;
/// use u_corridor::network::RoadGraph;
/// use u_corridor::routing::RouteEnumerator;
///
/// let empty = RoadGraph::new();
/// let routes = RouteEnumerator::default().enumerate(&empty, 3, 9);
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].nodes(), &[3, 9]);
/// assert_eq!(routes[0].kind(), RouteKind::Degenerate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEnumerator {
    k: usize,
    traversal_budget: usize,
}

impl Default for RouteEnumerator {
    fn default() -> Self {
        Self {
            k: 3,
            traversal_budget: 200,
        }
    }
}

impl RouteEnumerator {
    /// Creates an enumerator returning up to `k` routes (at least one).
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            ..Self::default()
        }
    }

    /// Caps the number of shortest-path searches per origin/destination pair.
    pub fn with_traversal_budget(mut self, budget: usize) -> Self {
        self.traversal_budget = budget;
        self
    }

    /// Maximum routes per pair.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Maximum shortest-path searches per pair.
    pub fn traversal_budget(&self) -> usize {
        self.traversal_budget
    }

    /// Enumerates candidate routes, cheapest first.
    pub fn enumerate(
        &self,
        graph: &RoadGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Vec<CandidateRoute> {
        if origin == destination {
            return vec![CandidateRoute::stationary(origin)];
        }

        let paths = k_shortest_paths(graph, origin, destination, self.k.max(1), self.traversal_budget);
        if !paths.is_empty() {
            return paths
                .into_iter()
                .map(|p| CandidateRoute::new(p.nodes, Some(p.cost), RouteKind::Weighted))
                .collect();
        }

        if let Some(nodes) = fewest_hops_path(graph, origin, destination) {
            debug!(origin, destination, "no weighted path, using fewest-hops path");
            let travel_time = graph.route_travel_time(&nodes);
            return vec![CandidateRoute::new(nodes, travel_time, RouteKind::Unweighted)];
        }

        warn!(origin, destination, "no path found, using degenerate route");
        vec![CandidateRoute::degenerate(origin, destination)]
    }
}
