//! Road network: annotated segments, the undirected graph, graph stores,
//! and a synthetic network provider.
//!
//! - [`RoadSegment`] — length, speed, congestion and derived travel time
//! - [`RoadGraph`] — undirected simple graph over opaque node ids
//! - [`GraphStore`] — injected key-value cache of built graphs
//! - [`SyntheticNetwork`] — seeded grid networks for demos and tests

mod error;
mod graph;
mod segment;
mod store;
mod synthetic;

pub use error::GraphError;
pub use graph::RoadGraph;
pub use segment::{RoadSegment, MAX_CONGESTION, MIN_CONGESTION};
pub use store::{load_or_build, GraphStore, MemoryGraphStore};
pub use synthetic::{random_od_pairs, SyntheticNetwork};
