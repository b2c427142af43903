//! # u-corridor
//!
//! Priority-aware route assignment for mixed emergency and regular traffic.
//! Candidate routes are enumerated per vehicle, route choices are encoded
//! as a QUBO whose conflict penalties scale with `1/priority`, and the
//! model is minimised by an exact, annealing or remote hybrid solver.
//!
//! ## Modules
//!
//! - [`network`] — Road segments, the road graph, graph stores, synthetic grids
//! - [`models`] — Domain types (Vehicle, CandidateRoute, EdgeKey, RouteSelection)
//! - [`routing`] — k-shortest simple paths with a fallback ladder
//! - [`scenario`] — Vehicle generation, route attachment, congestion tagging
//! - [`priority`] — Route ranking heuristic and green-corridor extraction
//! - [`qubo`] — Variable index, coefficient model and formulator
//! - [`solver`] — Exact, simulated annealing and remote hybrid solvers; decoding
//! - [`pipeline`] — Configuration and end-to-end orchestration

pub mod models;
pub mod network;
pub mod pipeline;
pub mod priority;
pub mod qubo;
pub mod routing;
pub mod scenario;
pub mod solver;
