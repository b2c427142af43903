//! Undirected road graph.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::RoadSegment;
use crate::models::{EdgeKey, NodeId};

/// Undirected simple road graph keyed by opaque node identifiers.
///
/// Nodes are intersections, edges are road segments carrying a
/// [`RoadSegment`]. At most one segment joins a pair of nodes; adding a
/// segment again replaces the earlier attributes. The graph may be empty
/// or disconnected.
///
/// # Examples
///
/// ```
/// use u_corridor::network::{RoadGraph, RoadSegment};
///
/// let mut g = RoadGraph::new();
/// g.add_segment(1, 2, RoadSegment::new(100.0, 30.0, 2).unwrap());
/// g.add_segment(2, 3, RoadSegment::new(200.0, 30.0, 8).unwrap());
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 2);
/// assert!(g.segment(2, 1).is_some());
/// assert!(g.route_travel_time(&[1, 2, 3]).is_some());
/// assert!(g.route_travel_time(&[1, 3]).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    graph: UnGraph<NodeId, RoadSegment>,
    index: HashMap<NodeId, NodeIndex>,
}

impl RoadGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an isolated intersection (no-op if it already exists).
    pub fn add_node(&mut self, node: NodeId) {
        self.node_index_or_insert(node);
    }

    /// Adds (or replaces) the segment between `u` and `v`.
    pub fn add_segment(&mut self, u: NodeId, v: NodeId, segment: RoadSegment) {
        let a = self.node_index_or_insert(u);
        let b = self.node_index_or_insert(v);
        self.graph.update_edge(a, b, segment);
    }

    /// Returns `true` if the intersection exists.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Number of intersections.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of road segments.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Intersections in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(move |i| self.graph[i])
    }

    /// Segments as `(u, v, attributes)` in insertion order.
    pub fn segments(&self) -> impl Iterator<Item = (NodeId, NodeId, &RoadSegment)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()], e.weight()))
    }

    /// Attributes of the segment joining `u` and `v`, in either direction.
    pub fn segment(&self, u: NodeId, v: NodeId) -> Option<&RoadSegment> {
        let a = *self.index.get(&u)?;
        let b = *self.index.get(&v)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge)
    }

    /// Attributes of the segment identified by an undirected key.
    pub fn segment_by_key(&self, key: EdgeKey) -> Option<&RoadSegment> {
        let (u, v) = key.endpoints();
        self.segment(u, v)
    }

    /// Sum of segment travel times along `nodes`.
    ///
    /// Returns `None` if any consecutive pair is not joined by a segment.
    /// A single-node route costs zero.
    pub fn route_travel_time(&self, nodes: &[NodeId]) -> Option<f64> {
        nodes
            .windows(2)
            .map(|w| self.segment(w[0], w[1]).map(RoadSegment::travel_time))
            .sum()
    }

    pub(crate) fn node_index(&self, node: NodeId) -> Option<NodeIndex> {
        self.index.get(&node).copied()
    }

    pub(crate) fn node_id(&self, index: NodeIndex) -> NodeId {
        self.graph[index]
    }

    pub(crate) fn inner(&self) -> &UnGraph<NodeId, RoadSegment> {
        &self.graph
    }

    fn node_index_or_insert(&mut self, node: NodeId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(node, idx);
        idx
    }
}
