//! Candidate route enumeration.
//!
//! - [`k_shortest_paths`] — Yen's k shortest simple paths by travel time
//! - [`fewest_hops_path`] — breadth-first path ignoring travel time
//! - [`RouteEnumerator`] — k-shortest enumeration with a fallback ladder
//!   that always yields at least one route

mod enumerator;
mod search;
mod yen;

pub use enumerator::RouteEnumerator;
pub use search::fewest_hops_path;
pub use yen::{k_shortest_paths, WeightedPath};
