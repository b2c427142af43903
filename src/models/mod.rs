//! Domain model types for priority-aware route assignment.
//!
//! Provides the core abstractions: undirected road edges, candidate routes
//! between an origin and a destination, vehicles with a type and priority
//! weight, and the per-vehicle route selection produced by every strategy.

mod edge;
mod route;
mod selection;
mod vehicle;

pub use edge::{EdgeKey, NodeId, OdPair};
pub use route::{CandidateRoute, RouteKind};
pub use selection::{RouteSelection, Violation, ViolationType};
pub use vehicle::{Vehicle, VehicleType};
