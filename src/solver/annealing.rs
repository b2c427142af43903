//! Simulated annealing over single-variable flips.
//!
//! # Algorithm
//!
//! Each restart ("read") starts from a uniformly random assignment and
//! performs `num_sweeps` passes over all variables. The inverse
//! temperature grows geometrically from `beta_hot` to `beta_cold`; a flip
//! with energy change `Δ` is accepted if `Δ ≤ 0` or with probability
//! `exp(-β·Δ)`. The best state seen during the read is its result.
//!
//! Reads are independent and run in parallel. Read `r` is seeded from
//! the base seed and `r`, so results do not depend on thread scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::{Sample, Sampler, SolverError};
use crate::qubo::{Adjacency, QuboModel};

/// Multiplier spreading read indices over the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for [`SimulatedAnnealingSolver`].
///
/// # Examples
///
/// ```
/// use u_corridor::solver::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_num_reads(10)
///     .with_num_sweeps(200)
///     .with_seed(7);
/// assert_eq!(config.num_reads, 10);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingConfig {
    /// Independent restarts.
    pub num_reads: usize,
    /// Full passes over the variables per restart.
    pub num_sweeps: usize,
    /// `(beta_hot, beta_cold)`; derived from the coefficients when `None`.
    pub beta_range: Option<(f64, f64)>,
    /// Base seed; drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            num_reads: 100,
            num_sweeps: 1000,
            beta_range: None,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_num_reads(mut self, n: usize) -> Self {
        self.num_reads = n.max(1);
        self
    }

    pub fn with_num_sweeps(mut self, n: usize) -> Self {
        self.num_sweeps = n.max(1);
        self
    }

    pub fn with_beta_range(mut self, hot: f64, cold: f64) -> Self {
        self.beta_range = Some((hot, cold));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Parallel-restart simulated annealing sampler.
///
/// Among reads reaching the same minimum energy, the lowest read index
/// wins.
///
/// # Examples
///
/// ```
/// use u_corridor::qubo::QuboModel;
/// use u_corridor::solver::{AnnealingConfig, Sampler, SimulatedAnnealingSolver};
///
/// let mut q = QuboModel::new(3);
/// for i in 0..3 {
///     q.add(i, i, -2.0);
///     for j in (i + 1)..3 {
///         q.add(i, j, 4.0);
///     }
/// }
/// q.add(1, 1, -0.5);
///
/// let solver = SimulatedAnnealingSolver::new(
///     AnnealingConfig::default().with_num_reads(20).with_num_sweeps(100).with_seed(1),
/// );
/// let sample = solver.sample(&q).unwrap();
/// assert_eq!(sample.values(), &[0, 1, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealingSolver {
    config: AnnealingConfig,
}

impl SimulatedAnnealingSolver {
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    fn base_seed(&self) -> u64 {
        match self.config.seed {
            Some(seed) => seed,
            None => StdRng::from_os_rng().random(),
        }
    }
}

impl Sampler for SimulatedAnnealingSolver {
    fn name(&self) -> &'static str {
        "simulated_annealing"
    }

    fn sample(&self, model: &QuboModel) -> Result<Sample, SolverError> {
        let n = model.num_variables();
        if n == 0 {
            return Ok(Sample::new(Vec::new(), model));
        }

        let (beta_hot, beta_cold) = self
            .config
            .beta_range
            .unwrap_or_else(|| default_beta_range(model));
        let schedule = geometric_schedule(beta_hot, beta_cold, self.config.num_sweeps);
        let adj = model.adjacency();
        let base = self.base_seed();

        let reads: Vec<Vec<u8>> = (0..self.config.num_reads.max(1))
            .into_par_iter()
            .map(|read| {
                let seed = base.wrapping_add((read as u64).wrapping_mul(SEED_STRIDE));
                let mut rng = StdRng::seed_from_u64(seed);
                anneal(&adj, &schedule, &mut rng)
            })
            .collect();

        // Re-score exactly; the running sums inside a read drift.
        let mut best: Option<(f64, Vec<u8>)> = None;
        for state in reads {
            let energy = model.energy(&state);
            match &best {
                Some((e, _)) if energy >= *e => {}
                _ => best = Some((energy, state)),
            }
        }

        let (energy, state) = best.unwrap_or_else(|| (0.0, vec![0; n]));
        debug!(
            variables = n,
            reads = self.config.num_reads,
            sweeps = self.config.num_sweeps,
            energy,
            "annealing finished"
        );
        Ok(Sample::new(state, model))
    }
}

/// One restart; returns the best state visited.
fn anneal<R: Rng>(adj: &Adjacency, schedule: &[f64], rng: &mut R) -> Vec<u8> {
    let n = adj.len();
    let mut state: Vec<u8> = (0..n).map(|_| rng.random_range(0..2u8)).collect();
    let mut energy = 0.0;
    let mut best_state = state.clone();
    let mut best_energy = energy;

    // Energy is tracked relative to the start state; only differences matter.
    for &beta in schedule {
        for i in 0..n {
            let delta = adj.flip_delta(&state, i);
            let accept = delta <= 0.0 || rng.random::<f64>() < (-beta * delta).exp();
            if accept {
                state[i] ^= 1;
                energy += delta;
                if energy < best_energy {
                    best_energy = energy;
                    best_state.copy_from_slice(&state);
                }
            }
        }
    }
    best_state
}

/// Inverse temperatures accepting the largest uphill move with
/// probability 1/2 at the start and the smallest with 1/100 at the end.
fn default_beta_range(model: &QuboModel) -> (f64, f64) {
    let adj = model.adjacency();
    let mut max_field: f64 = 0.0;
    for i in 0..adj.len() {
        let field = adj.linear[i].abs() + adj.neighbors[i].iter().map(|(_, q)| q.abs()).sum::<f64>();
        max_field = max_field.max(field);
    }
    let min_coefficient = model
        .iter()
        .map(|(_, _, q)| q.abs())
        .filter(|q| *q > 0.0)
        .fold(f64::INFINITY, f64::min);

    if max_field <= 0.0 || !min_coefficient.is_finite() {
        return (0.1, 1.0);
    }
    let hot = std::f64::consts::LN_2 / max_field;
    let cold = (100.0_f64).ln() / min_coefficient;
    (hot, cold.max(hot))
}

fn geometric_schedule(hot: f64, cold: f64, sweeps: usize) -> Vec<f64> {
    let sweeps = sweeps.max(1);
    if sweeps == 1 || hot <= 0.0 || cold <= 0.0 {
        return vec![cold.max(hot); sweeps];
    }
    let ratio = (cold / hot).powf(1.0 / (sweeps - 1) as f64);
    (0..sweeps).map(|s| hot * ratio.powi(s as i32)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRoute, RouteKind, Vehicle};
    use crate::qubo::QuboFormulator;
    use crate::solver::ExactSolver;

    fn route(nodes: &[u64], tt: f64) -> CandidateRoute {
        CandidateRoute::new(nodes.to_vec(), Some(tt), RouteKind::Weighted)
    }

    fn fast() -> AnnealingConfig {
        AnnealingConfig::default()
            .with_num_reads(100)
            .with_num_sweeps(200)
            .with_seed(42)
    }

    #[test]
    fn test_single_vehicle_picks_fastest_route() {
        let vehicles = vec![Vehicle::new(0, 1, 9).with_routes(vec![
            route(&[1, 2, 9], 1.0),
            route(&[1, 3, 9], 2.0),
            route(&[1, 4, 9], 3.0),
        ])];
        let (q, _) = QuboFormulator::new().formulate(&vehicles);
        for seed in 0..50 {
            let config = fast().with_seed(seed);
            let s = SimulatedAnnealingSolver::new(config).sample(&q).unwrap();
            assert_eq!(s.values(), &[1, 0, 0], "seed {}", seed);
        }
    }

    #[test]
    fn test_matches_exact_on_conflict_instance() {
        let shared = [1u64, 2, 3];
        let vehicles = vec![
            Vehicle::new(0, 1, 3).with_routes(vec![route(&shared, 1.0), route(&[1, 4, 3], 1.5)]),
            Vehicle::new(1, 1, 3).with_routes(vec![route(&shared, 1.0), route(&[1, 5, 3], 1.2)]),
            Vehicle::new(2, 1, 3)
                .with_priority_weight(100.0)
                .with_routes(vec![route(&shared, 1.0), route(&[1, 6, 3], 4.0)]),
        ];
        let (q, _) = QuboFormulator::new().formulate(&vehicles);
        let exact = ExactSolver::new().sample(&q).unwrap();
        let sa = SimulatedAnnealingSolver::new(fast()).sample(&q).unwrap();
        assert!((exact.energy() - sa.energy()).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut q = QuboModel::new(6);
        for i in 0..6 {
            q.add(i, i, -1.0);
            q.add(i, (i + 1) % 6, 1.5);
        }
        let solver = SimulatedAnnealingSolver::new(fast());
        let a = solver.sample(&q).unwrap();
        let b = solver.sample(&q).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_model() {
        let q = QuboModel::new(0);
        let s = SimulatedAnnealingSolver::default().sample(&q).unwrap();
        assert!(s.values().is_empty());
    }

    #[test]
    fn test_schedule_is_increasing() {
        let s = geometric_schedule(0.1, 10.0, 5);
        assert_eq!(s.len(), 5);
        assert!((s[0] - 0.1).abs() < 1e-12);
        assert!((s[4] - 10.0).abs() < 1e-9);
        assert!(s.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_beta_range_without_coefficients() {
        assert_eq!(default_beta_range(&QuboModel::new(3)), (0.1, 1.0));
    }
}
