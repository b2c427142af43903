//! End-to-end orchestration.
//!
//! ```text
//! graph + demands ──► Scenario ──► formulate ──► sample ──► decode ──► RouteSelection
//!                         └──────────── priority ranking ─────────────────┘
//! ```
//!
//! - [`PipelineConfig`] — every tunable, serde-loadable
//! - [`Pipeline`] — builds scenarios and runs a [`Strategy`]
//! - [`SelectionReport`] — emergency/regular breakdown of a result

mod config;
mod error;
mod report;
mod runner;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use report::SelectionReport;
pub use runner::{Pipeline, Strategy};
