//! Single-path searches over the road graph.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::models::NodeId;
use crate::network::RoadGraph;

/// Nodes and edges a search may not use.
#[derive(Debug, Default)]
pub(crate) struct Bans {
    pub nodes: HashSet<NodeIndex>,
    /// Undirected: stored as `(min, max)`.
    pub edges: HashSet<(NodeIndex, NodeIndex)>,
}

impl Bans {
    pub fn ban_edge(&mut self, a: NodeIndex, b: NodeIndex) {
        self.edges.insert(edge_pair(a, b));
    }

    fn allows(&self, from: NodeIndex, to: NodeIndex) -> bool {
        !self.nodes.contains(&to) && !self.edges.contains(&edge_pair(from, to))
    }
}

fn edge_pair(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Dijkstra by travel time from `source` to `target`, avoiding `bans`.
///
/// Equal-cost frontiers are expanded in node-index order so results are
/// deterministic. Returns `(cost, path)` with both endpoints included.
pub(crate) fn shortest_path(
    graph: &RoadGraph,
    source: NodeIndex,
    target: NodeIndex,
    bans: &Bans,
) -> Option<(f64, Vec<NodeIndex>)> {
    let inner = graph.inner();
    let n = inner.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[source.index()] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), source.index())));

    while let Some(Reverse((OrderedFloat(cost), idx))) = heap.pop() {
        let node = NodeIndex::new(idx);
        if node == target {
            return Some((cost, reconstruct(&prev, source, target)));
        }
        if cost > dist[idx] {
            continue;
        }
        for edge in inner.edges(node) {
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            if next == node || !bans.allows(node, next) {
                continue;
            }
            let candidate = cost + edge.weight().travel_time();
            if candidate < dist[next.index()] {
                dist[next.index()] = candidate;
                prev[next.index()] = Some(node);
                heap.push(Reverse((OrderedFloat(candidate), next.index())));
            }
        }
    }
    None
}

fn reconstruct(prev: &[Option<NodeIndex>], source: NodeIndex, target: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match prev[current.index()] {
            Some(p) => {
                path.push(p);
                current = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Breadth-first path with the fewest segments, ignoring travel time.
///
/// Returns `None` if either node is missing or they are disconnected.
///
/// # Examples
///
/// ```
/// use u_corridor::network::{RoadGraph, RoadSegment};
/// use u_corridor::routing::fewest_hops_path;
///
/// let mut g = RoadGraph::new();
/// let slow = RoadSegment::new(100.0, 10.0, 10).unwrap();
/// let fast = RoadSegment::new(10.0, 60.0, 1).unwrap();
/// g.add_segment(1, 4, slow);
/// g.add_segment(1, 2, fast);
/// g.add_segment(2, 3, fast);
/// g.add_segment(3, 4, fast);
/// assert_eq!(fewest_hops_path(&g, 1, 4), Some(vec![1, 4]));
/// ```
pub fn fewest_hops_path(graph: &RoadGraph, origin: NodeId, destination: NodeId) -> Option<Vec<NodeId>> {
    let source = graph.node_index(origin)?;
    let target = graph.node_index(destination)?;
    let inner = graph.inner();

    let mut prev: Vec<Option<NodeIndex>> = vec![None; inner.node_count()];
    let mut seen = vec![false; inner.node_count()];
    let mut queue = VecDeque::from([source]);
    seen[source.index()] = true;

    while let Some(node) = queue.pop_front() {
        if node == target {
            let path = reconstruct(&prev, source, target);
            return Some(path.into_iter().map(|i| graph.node_id(i)).collect());
        }
        let mut next: Vec<NodeIndex> = inner.neighbors(node).collect();
        next.sort();
        for n in next {
            if !seen[n.index()] {
                seen[n.index()] = true;
                prev[n.index()] = Some(node);
                queue.push_back(n);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RoadSegment;

    fn seg(length: f64) -> RoadSegment {
        RoadSegment::new(length, 60.0, 1).expect("valid")
    }

    fn diamond() -> RoadGraph {
        // 1 -> 2 -> 4 is cheap, 1 -> 3 -> 4 is expensive
        let mut g = RoadGraph::new();
        g.add_segment(1, 2, seg(100.0));
        g.add_segment(2, 4, seg(100.0));
        g.add_segment(1, 3, seg(500.0));
        g.add_segment(3, 4, seg(500.0));
        g
    }

    fn ids(g: &RoadGraph, path: &[NodeIndex]) -> Vec<NodeId> {
        path.iter().map(|&i| g.node_id(i)).collect()
    }

    #[test]
    fn test_shortest_path() {
        let g = diamond();
        let s = g.node_index(1).expect("node");
        let t = g.node_index(4).expect("node");
        let (cost, path) = shortest_path(&g, s, t, &Bans::default()).expect("path");
        assert_eq!(ids(&g, &path), vec![1, 2, 4]);
        assert!(cost > 0.0);
    }

    #[test]
    fn test_shortest_path_with_banned_edge() {
        let g = diamond();
        let s = g.node_index(1).expect("node");
        let t = g.node_index(4).expect("node");
        let mut bans = Bans::default();
        bans.ban_edge(g.node_index(2).expect("node"), s);
        let (_, path) = shortest_path(&g, s, t, &bans).expect("path");
        assert_eq!(ids(&g, &path), vec![1, 3, 4]);
    }

    #[test]
    fn test_shortest_path_with_banned_nodes() {
        let g = diamond();
        let s = g.node_index(1).expect("node");
        let t = g.node_index(4).expect("node");
        let mut bans = Bans::default();
        bans.nodes.insert(g.node_index(2).expect("node"));
        bans.nodes.insert(g.node_index(3).expect("node"));
        assert!(shortest_path(&g, s, t, &bans).is_none());
    }

    #[test]
    fn test_equal_cost_tie_goes_to_lower_index() {
        // Node 3 is inserted before node 2, so it has the lower index.
        let mut g = RoadGraph::new();
        g.add_segment(1, 3, seg(200.0));
        g.add_segment(3, 4, seg(200.0));
        g.add_segment(1, 2, seg(200.0));
        g.add_segment(2, 4, seg(200.0));
        let s = g.node_index(1).expect("node");
        let t = g.node_index(4).expect("node");
        for _ in 0..5 {
            let (_, path) = shortest_path(&g, s, t, &Bans::default()).expect("path");
            assert_eq!(ids(&g, &path), vec![1, 3, 4]);
        }
        assert_eq!(fewest_hops_path(&g, 1, 4), Some(vec![1, 3, 4]));
    }

    #[test]
    fn test_fewest_hops_disconnected() {
        let mut g = diamond();
        g.add_node(99);
        assert!(fewest_hops_path(&g, 1, 99).is_none());
        assert!(fewest_hops_path(&g, 1, 12345).is_none());
    }
}
