//! QUBO formulation of the route assignment.
//!
//! One binary variable per `(vehicle, route)` pair. The objective combines
//!
//! - an exactly-one-route penalty per vehicle,
//! - a congestion penalty for every pair of route choices sharing a road
//!   segment, scaled by `1/p1 + 1/p2` so conflicts involving emergency
//!   vehicles cost little and conflicts among regular traffic cost a lot,
//! - an optional travel-time bias towards each vehicle's faster routes.
//!
//! - [`VariableIndex`] — variable ↔ `(vehicle, route)` mapping
//! - [`QuboModel`] — symmetric coefficient map with additive accumulation
//! - [`QuboFormulator`] — builds both from a vehicle list

mod formulate;
mod model;
mod variables;

pub use formulate::QuboFormulator;
pub use model::QuboModel;
pub(crate) use model::Adjacency;
pub use variables::{VarKey, VariableIndex};
