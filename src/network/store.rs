//! Injected key-value store for built road graphs.
//!
//! Graph acquisition is slow (downloading and annotating a city network),
//! so callers cache built graphs. The store is owned by the caller and
//! passed in explicitly, either to [`load_or_build`] or to
//! [`Pipeline::build_scenario_from`](crate::pipeline::Pipeline::build_scenario_from).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::RoadGraph;

/// A key-value cache of road graphs.
///
/// Implementations must be safe to share between threads.
pub trait GraphStore: Send + Sync {
    /// Returns the graph cached under `key`, if any.
    fn get(&self, key: &str) -> Option<Arc<RoadGraph>>;

    /// Caches `graph` under `key`, replacing any earlier entry.
    fn put(&self, key: &str, graph: RoadGraph) -> Arc<RoadGraph>;
}

/// In-memory [`GraphStore`].
///
/// # Examples
///
/// ```
/// use u_corridor::network::{GraphStore, MemoryGraphStore, RoadGraph};
///
/// let store = MemoryGraphStore::new();
/// assert!(store.get("kochi").is_none());
/// store.put("kochi", RoadGraph::new());
/// assert!(store.get("kochi").is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    graphs: RwLock<HashMap<String, Arc<RoadGraph>>>,
}

impl MemoryGraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached graphs.
    pub fn len(&self) -> usize {
        self.graphs.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GraphStore for MemoryGraphStore {
    fn get(&self, key: &str) -> Option<Arc<RoadGraph>> {
        let graphs = self.graphs.read().ok()?;
        graphs.get(key).cloned()
    }

    fn put(&self, key: &str, graph: RoadGraph) -> Arc<RoadGraph> {
        let graph = Arc::new(graph);
        if let Ok(mut graphs) = self.graphs.write() {
            graphs.insert(key.to_string(), Arc::clone(&graph));
        }
        graph
    }
}

/// Returns the graph cached under `key`, building and caching it on a miss.
///
/// # Examples
///
/// ```
/// use u_corridor::network::{load_or_build, MemoryGraphStore, RoadGraph};
///
/// let store = MemoryGraphStore::new();
/// let g = load_or_build(&store, "empty", || Ok::<_, ()>(RoadGraph::new())).unwrap();
/// assert_eq!(g.node_count(), 0);
/// assert_eq!(store.len(), 1);
/// ```
pub fn load_or_build<S, F, E>(store: &S, key: &str, build: F) -> Result<Arc<RoadGraph>, E>
where
    S: GraphStore + ?Sized,
    F: FnOnce() -> Result<RoadGraph, E>,
{
    if let Some(graph) = store.get(key) {
        debug!(key, "road graph cache hit");
        return Ok(graph);
    }
    debug!(key, "road graph cache miss, building");
    let graph = build()?;
    Ok(store.put(key, graph))
}
