//! Scenario construction and strategy dispatch.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::{PipelineConfig, PipelineError};
use crate::models::{OdPair, RouteSelection};
use crate::network::{load_or_build, GraphStore, RoadGraph};
use crate::priority::select_best;
use crate::qubo::QuboFormulator;
use crate::routing::RouteEnumerator;
use crate::scenario::{PriorityPolicy, Scenario, ScenarioBuilder};
use crate::solver::{
    decode, AnnealingConfig, ExactSolver, HybridSampler, RemoteHybridSolver, Sampler, SimulatedAnnealingSolver,
    SolveMethod, SolverError,
};

/// How a scenario's routes are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Formulate a QUBO and minimise it with the given backend.
    Qubo(SolveMethod),
    /// Pick each vehicle's best-scoring route independently.
    PriorityRanking,
}

/// Route assignment pipeline.
///
/// # Examples
///
/// ```
/// use u_corridor::network::{random_od_pairs, SyntheticNetwork};
/// use u_corridor::pipeline::{Pipeline, PipelineConfig, Strategy};
/// use u_corridor::solver::SolveMethod;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(11);
/// let graph = SyntheticNetwork::grid(4, 4).build(&mut rng);
/// let pairs = random_od_pairs(&graph, 5, &mut rng);
///
/// let config = PipelineConfig::default().with_k(2).with_num_sweeps(200).with_seed(11);
/// let pipeline = Pipeline::new(config).unwrap();
/// let scenario = pipeline.build_scenario(&graph, &pairs);
///
/// let qubo = pipeline
///     .optimize(&scenario, Strategy::Qubo(SolveMethod::SimulatedAnnealing))
///     .unwrap();
/// let ranked = pipeline.optimize(&scenario, Strategy::PriorityRanking).unwrap();
/// assert_eq!(qubo.len(), 5);
/// assert_eq!(ranked.len(), 5);
/// ```
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    remote: Option<Arc<dyn HybridSampler>>,
}

impl Pipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            remote: None,
        })
    }

    /// Attaches the transport used by [`SolveMethod::RemoteHybrid`].
    pub fn with_remote(mut self, sampler: Arc<dyn HybridSampler>) -> Self {
        self.remote = Some(sampler);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Route enumerator configured from `k` and `traversal_budget`.
    pub fn enumerator(&self) -> RouteEnumerator {
        RouteEnumerator::new(self.config.k).with_traversal_budget(self.config.traversal_budget)
    }

    pub fn policy(&self) -> PriorityPolicy {
        PriorityPolicy {
            emergency_weight: self.config.emergency_priority,
            regular_weight: self.config.regular_priority,
        }
    }

    pub fn formulator(&self) -> QuboFormulator {
        QuboFormulator::new()
            .with_congestion_weight(self.config.congestion_weight)
            .with_route_cost_weight(self.config.route_cost_weight)
    }

    /// Builds a scenario, seeding the sampling from the configured seed.
    pub fn build_scenario(&self, graph: &RoadGraph, od_pairs: &[OdPair]) -> Scenario {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.build_scenario_with(graph, od_pairs, &mut rng)
    }

    /// Fetches the graph under `key` from `store`, building and caching it
    /// on a miss, then builds a scenario on it.
    ///
    /// The store is owned by the caller; only `build` failures are errors.
    pub fn build_scenario_from<S, F, E>(
        &self,
        store: &S,
        key: &str,
        build: F,
        od_pairs: &[OdPair],
    ) -> Result<(Arc<RoadGraph>, Scenario), E>
    where
        S: GraphStore + ?Sized,
        F: FnOnce() -> Result<RoadGraph, E>,
    {
        let graph = load_or_build(store, key, build)?;
        let scenario = self.build_scenario(&graph, od_pairs);
        Ok((graph, scenario))
    }

    /// Builds a scenario with a caller-supplied random source.
    pub fn build_scenario_with<R: Rng>(
        &self,
        graph: &RoadGraph,
        od_pairs: &[OdPair],
        rng: &mut R,
    ) -> Scenario {
        ScenarioBuilder::new(graph)
            .with_enumerator(self.enumerator())
            .with_emergency_ratio(self.config.emergency_ratio)
            .with_policy(self.policy())
            .with_congestion_threshold(self.config.congestion_threshold)
            .build(od_pairs, rng)
    }

    /// Solver backend for `method`.
    ///
    /// Fails with [`SolverError::Unavailable`] for
    /// [`SolveMethod::RemoteHybrid`] when no transport is attached.
    pub fn sampler(&self, method: SolveMethod) -> Result<Box<dyn Sampler>, PipelineError> {
        Ok(match method {
            SolveMethod::Exact => Box::new(
                ExactSolver::new().with_max_variables(self.config.exact_variable_limit),
            ),
            SolveMethod::SimulatedAnnealing => {
                let mut annealing = AnnealingConfig::default()
                    .with_num_reads(self.config.num_reads)
                    .with_num_sweeps(self.config.num_sweeps);
                if let Some(seed) = self.config.seed {
                    annealing = annealing.with_seed(seed);
                }
                Box::new(SimulatedAnnealingSolver::new(annealing))
            }
            SolveMethod::RemoteHybrid => {
                let client = self.remote.clone().ok_or_else(|| {
                    SolverError::Unavailable("no remote hybrid sampler configured".into())
                })?;
                Box::new(
                    RemoteHybridSolver::new(client)
                        .with_timeout(Duration::from_secs(self.config.remote_timeout_secs)),
                )
            }
        })
    }

    /// Solves `scenario` as a QUBO with the configured [`SolveMethod`].
    pub fn run(&self, scenario: &Scenario) -> Result<RouteSelection, PipelineError> {
        self.optimize(scenario, Strategy::Qubo(self.config.method))
    }

    /// Chooses one route per vehicle of `scenario`.
    ///
    /// Partial results are returned as values: vehicles the strategy could
    /// not serve stay unassigned and are listed in the selection's
    /// violations. Only solver failures are errors.
    pub fn optimize(
        &self,
        scenario: &Scenario,
        strategy: Strategy,
    ) -> Result<RouteSelection, PipelineError> {
        let selection = match strategy {
            Strategy::PriorityRanking => select_best(&scenario.vehicles, &scenario.congested_edges),
            Strategy::Qubo(method) => {
                let (model, index) = self.formulator().formulate(&scenario.vehicles);
                let sampler = self.sampler(method)?;
                let sample = sampler.sample(&model)?;
                info!(
                    solver = sampler.name(),
                    variables = model.num_variables(),
                    energy = sample.energy(),
                    "qubo solved"
                );
                decode(&sample, &index, &scenario.vehicles)
            }
        };

        info!(
            assigned = selection.num_assigned(),
            unassigned = selection.len() - selection.num_assigned(),
            violations = selection.violations().len(),
            "routes selected"
        );
        Ok(selection)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("remote", &self.remote.is_some())
            .finish()
    }
}
