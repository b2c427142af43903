//! Traffic scenario construction.
//!
//! Turns origin/destination demands into vehicles with a type, a priority
//! weight and candidate routes, and tags the congested segments of the
//! network.

mod builder;
mod vehicles;

pub use builder::{
    build_scenario, enumerate_routes, identify_congested_edges, RouteTable, Scenario,
    ScenarioBuilder, DEFAULT_CONGESTION_THRESHOLD,
};
pub use vehicles::{attach_routes, generate_vehicles, PriorityPolicy};
