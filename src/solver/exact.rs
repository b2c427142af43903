//! Exhaustive QUBO minimisation.

use tracing::debug;

use super::{Sample, Sampler, SolverError};
use crate::qubo::QuboModel;

/// Default variable limit for exhaustive enumeration.
pub const DEFAULT_MAX_VARIABLES: usize = 20;

/// Hard ceiling, independent of configuration.
const HARD_LIMIT: usize = 30;

/// Brute-force solver visiting all `2^n` assignments.
///
/// Assignments are walked in reflected Gray-code order so each step
/// flips one variable and costs only that variable's neighbourhood.
/// Among equal-energy minima the first one visited wins, so the result
/// is deterministic.
///
/// # Examples
///
/// ```
/// use u_corridor::qubo::QuboModel;
/// use u_corridor::solver::{ExactSolver, Sampler};
///
/// let mut q = QuboModel::new(2);
/// q.add(0, 0, -1.0);
/// q.add(1, 1, -2.0);
/// q.add(0, 1, 4.0);
/// let sample = ExactSolver::new().sample(&q).unwrap();
/// assert_eq!(sample.values(), &[0, 1]);
/// assert_eq!(sample.energy(), -2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactSolver {
    max_variables: usize,
}

impl ExactSolver {
    /// Creates a solver with the default limit.
    pub fn new() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }

    /// Sets the variable limit, capped at 30.
    pub fn with_max_variables(mut self, max_variables: usize) -> Self {
        self.max_variables = max_variables.min(HARD_LIMIT);
        self
    }

    /// Current variable limit.
    pub fn max_variables(&self) -> usize {
        self.max_variables
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn sample(&self, model: &QuboModel) -> Result<Sample, SolverError> {
        let n = model.num_variables();
        if n > self.max_variables {
            return Err(SolverError::ProblemTooLarge {
                variables: n,
                limit: self.max_variables,
            });
        }

        let adj = model.adjacency();
        let mut state = vec![0u8; n];
        let mut energy = 0.0;
        let mut best_state = state.clone();
        let mut best_energy = energy;

        for step in 1u64..(1u64 << n) {
            let bit = step.trailing_zeros() as usize;
            energy += adj.flip_delta(&state, bit);
            state[bit] ^= 1;
            if energy < best_energy {
                best_energy = energy;
                best_state.copy_from_slice(&state);
            }
        }

        debug!(variables = n, energy = best_energy, "exact solve finished");
        Ok(Sample::new(best_state, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRoute, RouteKind, Vehicle};
    use crate::qubo::QuboFormulator;

    fn route(nodes: &[u64], tt: f64) -> CandidateRoute {
        CandidateRoute::new(nodes.to_vec(), Some(tt), RouteKind::Weighted)
    }

    #[test]
    fn test_exact_rejects_large_model() {
        let q = QuboModel::new(21);
        let err = ExactSolver::new().sample(&q).unwrap_err();
        assert_eq!(
            err,
            SolverError::ProblemTooLarge {
                variables: 21,
                limit: 20
            }
        );
    }

    #[test]
    fn test_exact_empty_model() {
        let q = QuboModel::new(0);
        let s = ExactSolver::new().sample(&q).unwrap();
        assert!(s.values().is_empty());
        assert_eq!(s.energy(), 0.0);
    }

    #[test]
    fn test_exact_finds_global_minimum() {
        let mut q = QuboModel::new(4);
        q.add(0, 0, 1.0);
        q.add(1, 1, -1.0);
        q.add(2, 2, -1.0);
        q.add(3, 3, -0.5);
        q.add(1, 2, 3.0);
        q.add(0, 3, -2.0);
        let s = ExactSolver::new().sample(&q).unwrap();

        let best = (0u32..16)
            .map(|m| {
                let x: Vec<u8> = (0..4).map(|i| ((m >> i) & 1) as u8).collect();
                q.energy(&x)
            })
            .fold(f64::INFINITY, f64::min);
        assert!((s.energy() - best).abs() < 1e-12);
    }

    #[test]
    fn test_exact_tie_takes_first_visited() {
        let mut q = QuboModel::new(2);
        q.add(0, 0, -1.0);
        q.add(1, 1, -1.0);
        q.add(0, 1, 1.0);
        // [1,0], [0,1] and [1,1] all reach -1; Gray order visits [1,0] first.
        let s = ExactSolver::new().sample(&q).unwrap();
        assert_eq!(s.values(), &[1, 0]);
    }

    #[test]
    fn test_exact_two_independent_vehicles_pick_cheapest() {
        let vehicles = vec![
            Vehicle::new(0, 1, 3).with_routes(vec![route(&[1, 2, 3], 1.0), route(&[1, 4, 3], 2.0)]),
            Vehicle::new(1, 5, 7).with_routes(vec![route(&[5, 6, 7], 1.0), route(&[5, 8, 7], 3.0)]),
        ];
        let (q, _) = QuboFormulator::new().formulate(&vehicles);
        let s = ExactSolver::new().sample(&q).unwrap();
        assert_eq!(s.values(), &[1, 0, 1, 0]);
    }

    #[test]
    fn test_exact_zero_priority_weight_still_assigns() {
        let vehicles = vec![
            Vehicle::new(0, 1, 3)
                .with_priority_weight(0.0)
                .with_routes(vec![route(&[1, 2, 3], 1.0), route(&[1, 4, 3], 2.0)]),
            Vehicle::new(1, 1, 3).with_routes(vec![route(&[1, 2, 3], 1.0), route(&[1, 5, 3], 2.0)]),
        ];
        let (q, _) = QuboFormulator::new().formulate(&vehicles);
        let s = ExactSolver::new().sample(&q).unwrap();
        assert!(s.energy().is_finite());
        assert_eq!(s.values(), &[1, 0, 1, 0]);
    }

    #[test]
    fn test_max_variables_capped() {
        assert_eq!(ExactSolver::new().with_max_variables(64).max_variables(), 30);
    }
}
