//! QUBO solvers and solution decoding.
//!
//! Every backend implements [`Sampler`]: it takes a [`QuboModel`] and
//! returns one binary [`Sample`].
//!
//! - [`ExactSolver`] — enumerates all `2^n` assignments; only for small `n`
//! - [`SimulatedAnnealingSolver`] — parallel restarts of single-flip annealing
//! - [`RemoteHybridSolver`] — delegates to an external service through a
//!   [`HybridSampler`] transport, with a hard timeout
//!
//! [`decode`] maps the sample back onto vehicle routes.
//!
//! [`QuboModel`]: crate::qubo::QuboModel

mod annealing;
mod decode;
mod error;
mod exact;
#[cfg(feature = "remote")]
mod http;
mod remote;
mod sample;

pub use annealing::{AnnealingConfig, SimulatedAnnealingSolver};
pub use decode::decode;
pub use error::SolverError;
pub use exact::ExactSolver;
#[cfg(feature = "remote")]
pub use http::HttpHybridSampler;
pub use remote::{HybridRequest, HybridResponse, HybridSampler, RemoteHybridSolver};
pub use sample::Sample;

use serde::{Deserialize, Serialize};

use crate::qubo::QuboModel;

/// A QUBO backend returning a single best sample.
pub trait Sampler: Send + Sync {
    /// Short backend name, for logs.
    fn name(&self) -> &'static str;

    /// Minimises `model` and returns the best assignment found.
    fn sample(&self, model: &QuboModel) -> Result<Sample, SolverError>;
}

/// Solver backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    /// [`ExactSolver`].
    Exact,
    /// [`SimulatedAnnealingSolver`].
    #[default]
    #[serde(alias = "sa", alias = "simulated-annealing")]
    SimulatedAnnealing,
    /// [`RemoteHybridSolver`].
    #[serde(alias = "remote-hybrid", alias = "hybrid")]
    RemoteHybrid,
}
