//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use super::PipelineError;
use crate::network::{MAX_CONGESTION, MIN_CONGESTION};
use crate::solver::SolveMethod;

/// All tunables of a [`Pipeline`](super::Pipeline) run.
///
/// Missing JSON fields take their default.
///
/// # Examples
///
/// ```
/// use u_corridor::pipeline::PipelineConfig;
/// use u_corridor::solver::SolveMethod;
///
/// let config = PipelineConfig::from_json(r#"{"k": 2, "method": "exact"}"#).unwrap();
/// assert_eq!(config.k, 2);
/// assert_eq!(config.method, SolveMethod::Exact);
/// assert_eq!(config.num_reads, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Candidate routes per vehicle.
    pub k: usize,
    /// Shortest-path searches allowed per origin/destination pair.
    pub traversal_budget: usize,
    /// Fraction of vehicles that are emergency vehicles, in `(0, 1)`.
    pub emergency_ratio: f64,
    /// Congestion level from which a segment counts as congested.
    pub congestion_threshold: u8,
    /// Scale of the shared-segment penalty.
    pub congestion_weight: f64,
    /// Scale of the travel-time bias; `0` disables it.
    pub route_cost_weight: f64,
    /// Annealing restarts.
    pub num_reads: usize,
    /// Annealing sweeps per restart.
    pub num_sweeps: usize,
    /// Solver backend for QUBO runs.
    pub method: SolveMethod,
    /// Largest model the exact solver accepts.
    pub exact_variable_limit: usize,
    /// Deadline for remote solves, in seconds.
    pub remote_timeout_secs: u64,
    /// Priority weight of emergency vehicles.
    pub emergency_priority: f64,
    /// Priority weight of regular vehicles.
    pub regular_priority: f64,
    /// Seed for scenario sampling and annealing; random when absent.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            k: 3,
            traversal_budget: 200,
            emergency_ratio: 0.2,
            congestion_threshold: 7,
            congestion_weight: 1.0,
            route_cost_weight: 0.1,
            num_reads: 100,
            num_sweeps: 1000,
            method: SolveMethod::SimulatedAnnealing,
            exact_variable_limit: 20,
            remote_timeout_secs: 60,
            emergency_priority: 100.0,
            regular_priority: 1.0,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_emergency_ratio(mut self, ratio: f64) -> Self {
        self.emergency_ratio = ratio;
        self
    }

    pub fn with_congestion_weight(mut self, weight: f64) -> Self {
        self.congestion_weight = weight;
        self
    }

    pub fn with_route_cost_weight(mut self, weight: f64) -> Self {
        self.route_cost_weight = weight;
        self
    }

    pub fn with_num_reads(mut self, n: usize) -> Self {
        self.num_reads = n;
        self
    }

    pub fn with_num_sweeps(mut self, n: usize) -> Self {
        self.num_sweeps = n;
        self
    }

    pub fn with_method(mut self, method: SolveMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every field against its admissible range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let fail = |msg: String| Err(PipelineError::Config(msg));

        if self.k == 0 {
            return fail("k must be at least 1".into());
        }
        if self.traversal_budget == 0 {
            return fail("traversal_budget must be at least 1".into());
        }
        if !(self.emergency_ratio > 0.0 && self.emergency_ratio < 1.0) {
            return fail(format!(
                "emergency_ratio must be in (0, 1), got {}",
                self.emergency_ratio
            ));
        }
        if !(MIN_CONGESTION..=MAX_CONGESTION).contains(&self.congestion_threshold) {
            return fail(format!(
                "congestion_threshold must be in {}..={}, got {}",
                MIN_CONGESTION, MAX_CONGESTION, self.congestion_threshold
            ));
        }
        if !(self.congestion_weight >= 0.0 && self.congestion_weight.is_finite()) {
            return fail(format!(
                "congestion_weight must be non-negative, got {}",
                self.congestion_weight
            ));
        }
        // Must stay below the one-route reward of the formulation.
        if !(self.route_cost_weight >= 0.0 && self.route_cost_weight < 2.0) {
            return fail(format!(
                "route_cost_weight must be in [0, 2), got {}",
                self.route_cost_weight
            ));
        }
        if self.num_reads == 0 || self.num_sweeps == 0 {
            return fail("num_reads and num_sweeps must be at least 1".into());
        }
        if !(self.emergency_priority > 0.0 && self.regular_priority > 0.0) {
            return fail("priority weights must be positive".into());
        }
        if self.remote_timeout_secs == 0 {
            return fail("remote_timeout_secs must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad = [
            PipelineConfig::default().with_k(0),
            PipelineConfig::default().with_emergency_ratio(0.0),
            PipelineConfig::default().with_emergency_ratio(1.0),
            PipelineConfig::default().with_congestion_weight(-1.0),
            PipelineConfig::default().with_route_cost_weight(2.0),
            PipelineConfig::default().with_num_reads(0),
            PipelineConfig {
                regular_priority: 0.0,
                ..Default::default()
            },
            PipelineConfig {
                congestion_threshold: 11,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(PipelineError::Config(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_from_json_aliases_and_defaults() {
        let c = PipelineConfig::from_json(r#"{"method": "sa", "seed": 9}"#).unwrap();
        assert_eq!(c.method, SolveMethod::SimulatedAnnealing);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.k, 3);

        let c = PipelineConfig::from_json(r#"{"method": "remote_hybrid"}"#).unwrap();
        assert_eq!(c.method, SolveMethod::RemoteHybrid);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(PipelineConfig::from_json("{not json").is_err());
        assert!(PipelineConfig::from_json(r#"{"emergency_ratio": 1.5}"#).is_err());
    }

    #[test]
    fn test_serde_roundtrip_preserves_seed() {
        let c = PipelineConfig::default().with_seed(3);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), c);
    }
}
