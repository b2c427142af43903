//! Node identifiers and undirected edge keys.

use serde::{Deserialize, Serialize};

/// Opaque intersection identifier (e.g. an OSM node id).
pub type NodeId = u64;

/// Origin/destination pair defining one travel demand.
pub type OdPair = (NodeId, NodeId);

/// An undirected road segment key.
///
/// `(a, b)` and `(b, a)` map to the same key, so a segment traversed in
/// either direction by two routes is recognised as the same physical road.
///
/// # Examples
///
/// ```
/// use u_corridor::models::EdgeKey;
///
/// assert_eq!(EdgeKey::new(7, 3), EdgeKey::new(3, 7));
/// assert_eq!(EdgeKey::new(7, 3).endpoints(), (3, 7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    /// Creates the canonical key for the segment between `a` and `b`.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Returns the endpoints in canonical (ascending) order.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }

    /// Returns `true` if `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.0 == node || self.1 == node
    }
}

impl From<(NodeId, NodeId)> for EdgeKey {
    fn from((a, b): (NodeId, NodeId)) -> Self {
        Self::new(a, b)
    }
}
