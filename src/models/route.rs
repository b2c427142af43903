//! Candidate route types.

use serde::{Deserialize, Serialize};

use super::{EdgeKey, NodeId};

/// How a candidate route was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    /// Shortest simple path by cumulative travel time.
    Weighted,
    /// Fewest-hops path, used when no weighted path exists.
    Unweighted,
    /// One-hop `[origin, destination]` placeholder; the segment may not exist.
    ///
    /// Marks a vehicle that has no real route through the network.
    Degenerate,
}

/// An ordered node sequence forming a walk between an origin and a destination.
///
/// A route always holds at least one node. When origin and destination
/// coincide the route is a single node and has no edges.
///
/// # Examples
///
/// ```
/// use u_corridor::models::{CandidateRoute, EdgeKey, RouteKind};
///
/// let route = CandidateRoute::new(vec![1, 2, 3], Some(4.5), RouteKind::Weighted);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.edges(), vec![(1, 2), (2, 3)]);
/// assert_eq!(route.edge_keys()[1], EdgeKey::new(3, 2));
/// assert_eq!(route.origin(), 1);
/// assert_eq!(route.destination(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    nodes: Vec<NodeId>,
    travel_time: Option<f64>,
    kind: RouteKind,
}

impl CandidateRoute {
    /// Creates a route from its node sequence.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` is empty.
    pub fn new(nodes: Vec<NodeId>, travel_time: Option<f64>, kind: RouteKind) -> Self {
        assert!(!nodes.is_empty(), "a route needs at least one node");
        Self {
            nodes,
            travel_time,
            kind,
        }
    }

    /// Creates the degenerate one-hop route `[origin, destination]`.
    pub fn degenerate(origin: NodeId, destination: NodeId) -> Self {
        Self {
            nodes: vec![origin, destination],
            travel_time: None,
            kind: RouteKind::Degenerate,
        }
    }

    /// Creates the single-node route used when origin equals destination.
    pub fn stationary(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            travel_time: Some(0.0),
            kind: RouteKind::Weighted,
        }
    }

    /// Ordered nodes of this route.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a route holds at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node.
    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    /// Last node.
    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Cumulative travel time in minutes, `None` for degenerate routes.
    pub fn travel_time(&self) -> Option<f64> {
        self.travel_time
    }

    /// How this route was obtained.
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Returns `true` for the `[origin, destination]` placeholder.
    pub fn is_degenerate(&self) -> bool {
        self.kind == RouteKind::Degenerate
    }

    /// Consecutive node pairs in travel direction.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Consecutive node pairs as undirected keys.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.nodes
            .windows(2)
            .map(|w| EdgeKey::new(w[0], w[1]))
            .collect()
    }
}
