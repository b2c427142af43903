//! Yen's k shortest simple paths.
//!
//! # Algorithm
//!
//! The first path is a plain Dijkstra by travel time. Each following path
//! is found by taking every prefix ("root") of the previous path, banning
//! the edges that already-found paths sharing that root leave it by, banning
//! the root's nodes, and searching a "spur" from the root's last node to the
//! target. Spur results become candidates; the cheapest unseen candidate is
//! accepted next.
//!
//! # Complexity
//!
//! O(k · n · (m + n log n)) for paths of up to n nodes over m segments. The
//! number of spur searches is capped by a traversal budget so dense graphs
//! cannot stall enumeration.
//!
//! # Reference
//!
//! Yen, J.Y. (1971). "Finding the k shortest loopless paths in a network",
//! *Management Science* 17(11), 712-716.

use petgraph::graph::NodeIndex;
use tracing::debug;

use super::search::{shortest_path, Bans};
use crate::models::NodeId;
use crate::network::RoadGraph;

/// A simple path together with its cumulative travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath {
    /// Travel time in minutes.
    pub cost: f64,
    /// Nodes from origin to destination.
    pub nodes: Vec<NodeId>,
}

/// Returns up to `k` distinct simple paths from `origin` to `destination`,
/// cheapest first.
///
/// At most `traversal_budget` shortest-path searches are run (at least one);
/// when the budget runs out the paths found so far are returned. Equal-cost
/// candidates are accepted in discovery order. Returns an empty list if
/// either node is missing, the nodes are disconnected, or `k == 0`.
///
/// # Examples
///
/// ```
/// use u_corridor::network::{RoadGraph, RoadSegment};
/// use u_corridor::routing::k_shortest_paths;
///
/// let mut g = RoadGraph::new();
/// let s = |len: f64| RoadSegment::new(len, 60.0, 1).unwrap();
/// g.add_segment(1, 2, s(100.0));
/// g.add_segment(2, 4, s(100.0));
/// g.add_segment(1, 3, s(200.0));
/// g.add_segment(3, 4, s(200.0));
///
/// let paths = k_shortest_paths(&g, 1, 4, 3, 100);
/// assert_eq!(paths.len(), 2);
/// assert_eq!(paths[0].nodes, vec![1, 2, 4]);
/// assert_eq!(paths[1].nodes, vec![1, 3, 4]);
/// ```
pub fn k_shortest_paths(
    graph: &RoadGraph,
    origin: NodeId,
    destination: NodeId,
    k: usize,
    traversal_budget: usize,
) -> Vec<WeightedPath> {
    let (Some(source), Some(target)) = (graph.node_index(origin), graph.node_index(destination))
    else {
        return Vec::new();
    };
    if k == 0 {
        return Vec::new();
    }

    let mut searches = 1;
    let Some(first) = shortest_path(graph, source, target, &Bans::default()) else {
        return Vec::new();
    };

    let mut accepted: Vec<(f64, Vec<NodeIndex>)> = vec![first];
    let mut candidates: Vec<(f64, Vec<NodeIndex>)> = Vec::new();

    'outer: while accepted.len() < k {
        let previous = accepted[accepted.len() - 1].1.clone();

        for i in 0..previous.len() - 1 {
            if searches >= traversal_budget {
                debug!(searches, found = accepted.len(), "traversal budget exhausted");
                break 'outer;
            }

            let spur = previous[i];
            let root = &previous[..=i];

            let mut bans = Bans::default();
            for (_, path) in &accepted {
                if path.len() > i + 1 && path[..=i] == *root {
                    bans.ban_edge(path[i], path[i + 1]);
                }
            }
            bans.nodes.extend(root[..i].iter().copied());

            searches += 1;
            if let Some((spur_cost, spur_path)) = shortest_path(graph, spur, target, &bans) {
                let mut total = root[..i].to_vec();
                total.extend(spur_path);
                let cost = path_cost(graph, root) + spur_cost;

                let known = accepted.iter().chain(candidates.iter()).any(|(_, p)| *p == total);
                if !known {
                    candidates.push((cost, total));
                }
            }
        }

        match take_cheapest(&mut candidates) {
            Some(next) => accepted.push(next),
            None => break,
        }
    }

    debug!(origin, destination, found = accepted.len(), searches, "k shortest paths");

    accepted
        .into_iter()
        .map(|(cost, path)| WeightedPath {
            cost,
            nodes: path.into_iter().map(|i| graph.node_id(i)).collect(),
        })
        .collect()
}

fn path_cost(graph: &RoadGraph, path: &[NodeIndex]) -> f64 {
    let inner = graph.inner();
    path.windows(2)
        .filter_map(|w| inner.find_edge(w[0], w[1]))
        .filter_map(|e| inner.edge_weight(e))
        .map(|s| s.travel_time())
        .sum()
}

/// Removes and returns the cheapest candidate, earliest on ties.
fn take_cheapest(candidates: &mut Vec<(f64, Vec<NodeIndex>)>) -> Option<(f64, Vec<NodeIndex>)> {
    let mut best: Option<usize> = None;
    for (i, (cost, _)) in candidates.iter().enumerate() {
        match best {
            Some(b) if candidates[b].0 <= *cost => {}
            _ => best = Some(i),
        }
    }
    best.map(|i| candidates.remove(i))
}
