//! Priority-ranking heuristic and green corridors.
//!
//! A cheap alternative to the QUBO solve: each vehicle independently takes
//! the route with the best `priority / (1 + congested segments)` score.
//! Runs in O(vehicles × routes × route length) and yields the same
//! [`RouteSelection`](crate::models::RouteSelection) shape as the decoder.

mod corridor;
mod ranking;

pub use corridor::{emergency_corridor, separate_vehicles};
pub use ranking::{rank_routes, route_priority, select_best, RankedRoute};
