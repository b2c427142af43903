//! Seeded synthetic road networks.
//!
//! Stands in for a mapping provider: a rectangular grid of intersections
//! whose segments get random lengths, posted speeds and congestion levels,
//! drawn from the same ranges the provider annotation step falls back to
//! when real data is missing.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::segment::{MAX_CONGESTION, MIN_CONGESTION};
use super::{RoadGraph, RoadSegment};
use crate::models::{NodeId, OdPair};

const SPEEDS_KMH: [f64; 4] = [30.0, 40.0, 50.0, 60.0];

/// Builder for grid-shaped road networks.
///
/// Node `r * cols + c` sits at row `r`, column `c` and is joined to its
/// right and lower neighbours.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_corridor::network::SyntheticNetwork;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let g = SyntheticNetwork::grid(3, 4).build(&mut rng);
/// assert_eq!(g.node_count(), 12);
/// assert_eq!(g.edge_count(), 3 * 3 + 2 * 4);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticNetwork {
    rows: usize,
    cols: usize,
    min_length: u32,
    max_length: u32,
    min_congestion: u8,
    max_congestion: u8,
}

impl SyntheticNetwork {
    /// Creates a `rows × cols` grid with default attribute ranges.
    pub fn grid(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            min_length: 50,
            max_length: 300,
            min_congestion: MIN_CONGESTION,
            max_congestion: MAX_CONGESTION,
        }
    }

    /// Sets the segment length range in meters (inclusive).
    pub fn with_length_range(mut self, min: u32, max: u32) -> Self {
        self.min_length = min.max(1);
        self.max_length = max.max(self.min_length);
        self
    }

    /// Sets the congestion level range (inclusive, clamped to `1..=10`).
    pub fn with_congestion_range(mut self, min: u8, max: u8) -> Self {
        self.min_congestion = min.clamp(MIN_CONGESTION, MAX_CONGESTION);
        self.max_congestion = max.clamp(self.min_congestion, MAX_CONGESTION);
        self
    }

    /// Builds the network.
    pub fn build<R: Rng>(&self, rng: &mut R) -> RoadGraph {
        let mut graph = RoadGraph::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let node = self.node_at(r, c);
                graph.add_node(node);
                if c + 1 < self.cols {
                    let segment = self.random_segment(rng);
                    graph.add_segment(node, self.node_at(r, c + 1), segment);
                }
                if r + 1 < self.rows {
                    let segment = self.random_segment(rng);
                    graph.add_segment(node, self.node_at(r + 1, c), segment);
                }
            }
        }
        graph
    }

    fn node_at(&self, row: usize, col: usize) -> NodeId {
        (row * self.cols + col) as NodeId
    }

    fn random_segment<R: Rng>(&self, rng: &mut R) -> RoadSegment {
        let length = f64::from(rng.random_range(self.min_length..=self.max_length));
        let speed = SPEEDS_KMH.choose(rng).copied().unwrap_or(SPEEDS_KMH[0]);
        let congestion = rng.random_range(self.min_congestion..=self.max_congestion);
        RoadSegment::from_valid(length, speed, congestion)
    }
}

/// Samples `n` origin/destination pairs of distinct intersections.
///
/// Returns an empty list when the graph has fewer than two nodes.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_corridor::network::{random_od_pairs, SyntheticNetwork};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let g = SyntheticNetwork::grid(4, 4).build(&mut rng);
/// let pairs = random_od_pairs(&g, 5, &mut rng);
/// assert_eq!(pairs.len(), 5);
/// assert!(pairs.iter().all(|(o, d)| o != d));
/// ```
pub fn random_od_pairs<R: Rng>(graph: &RoadGraph, n: usize, rng: &mut R) -> Vec<OdPair> {
    let nodes: Vec<NodeId> = graph.nodes().collect();
    if nodes.len() < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|_| {
            let picked = rand::seq::index::sample(rng, nodes.len(), 2);
            (nodes[picked.index(0)], nodes[picked.index(1)])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = SyntheticNetwork::grid(2, 2).build(&mut rng);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(g.segment(0, 1).is_some());
        assert!(g.segment(0, 2).is_some());
        assert!(g.segment(0, 3).is_none());
    }

    #[test]
    fn test_attribute_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = SyntheticNetwork::grid(5, 5)
            .with_congestion_range(7, 9)
            .build(&mut rng);
        for (_, _, seg) in g.segments() {
            assert!((50.0..=300.0).contains(&seg.length()));
            assert!(SPEEDS_KMH.contains(&seg.speed()));
            assert!((7..=9).contains(&seg.congestion()));
        }
    }

    #[test]
    fn test_seeded_reproducible() {
        let a = SyntheticNetwork::grid(3, 3).build(&mut StdRng::seed_from_u64(11));
        let b = SyntheticNetwork::grid(3, 3).build(&mut StdRng::seed_from_u64(11));
        let sa: Vec<_> = a.segments().map(|(u, v, s)| (u, v, *s)).collect();
        let sb: Vec<_> = b.segments().map(|(u, v, s)| (u, v, *s)).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_od_pairs_tiny_graph() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = SyntheticNetwork::grid(1, 1).build(&mut rng);
        assert!(random_od_pairs(&g, 3, &mut rng).is_empty());
    }
}
