//! Remote hybrid solving behind a pluggable transport.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Sample, Sampler, SolverError};
use crate::qubo::QuboModel;

/// Default deadline for a remote solve.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Job submitted to a hybrid service.
///
/// Variables are addressed by their model labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridRequest {
    /// Diagonal coefficients by label.
    pub linear: BTreeMap<String, f64>,
    /// Off-diagonal coefficients as `(label_i, label_j, value)`.
    pub quadratic: Vec<(String, String, f64)>,
    /// Solver-side time limit in seconds.
    pub time_limit_secs: u64,
}

impl HybridRequest {
    /// Serialises `model` into a request.
    pub fn from_model(model: &QuboModel, time_limit: Duration) -> Self {
        let label = |i: usize| {
            model
                .label(i)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("x{}", i))
        };
        let mut linear: BTreeMap<String, f64> =
            (0..model.num_variables()).map(|i| (label(i), 0.0)).collect();
        let mut quadratic = Vec::new();
        for (i, j, q) in model.iter() {
            if i == j {
                linear.insert(label(i), q);
            } else {
                quadratic.push((label(i), label(j), q));
            }
        }
        Self {
            linear,
            quadratic,
            time_limit_secs: time_limit.as_secs().max(1),
        }
    }
}

/// Best sample returned by a hybrid service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridResponse {
    /// Variable values by label.
    pub sample: BTreeMap<String, u8>,
    /// Energy as reported by the service, if any.
    #[serde(default)]
    pub energy: Option<f64>,
}

/// Transport to a hybrid solving service.
///
/// Implementations classify failures into [`SolverError`] variants:
/// credentials into `Unauthorized`, quota into `QuotaExceeded`, transport
/// problems into `Unavailable`.
///
/// [`RemoteHybridSolver`] stops waiting at its deadline but cannot cancel
/// a running `submit`: the worker thread lives until the call returns.
/// Implementations must therefore bound their own blocking time, as
/// [`HttpHybridSampler`](super::HttpHybridSampler) does with its client
/// timeout.
pub trait HybridSampler: Send + Sync {
    fn submit(&self, request: &HybridRequest) -> Result<HybridResponse, SolverError>;
}

/// [`Sampler`] delegating to a [`HybridSampler`] with a hard deadline.
///
/// The transport call runs on a worker thread. If it does not answer
/// within the timeout, [`SolverError::Timeout`] is returned and the
/// worker's eventual answer is discarded and logged. Workers still
/// running are counted by [`pending_workers`](Self::pending_workers).
/// Failures are never masked by a local fallback.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use u_corridor::qubo::QuboModel;
/// use u_corridor::solver::{
///     HybridRequest, HybridResponse, HybridSampler, RemoteHybridSolver, Sampler, SolverError,
/// };
///
/// struct AllOnes;
/// impl HybridSampler for AllOnes {
///     fn submit(&self, req: &HybridRequest) -> Result<HybridResponse, SolverError> {
///         let sample = req.linear.keys().map(|k| (k.clone(), 1)).collect();
///         Ok(HybridResponse { sample, energy: None })
///     }
/// }
///
/// let solver = RemoteHybridSolver::new(Arc::new(AllOnes)).with_timeout(Duration::from_secs(5));
/// let s = solver.sample(&QuboModel::new(2)).unwrap();
/// assert_eq!(s.values(), &[1, 1]);
/// ```
#[derive(Clone)]
pub struct RemoteHybridSolver {
    client: Arc<dyn HybridSampler>,
    timeout: Duration,
    pending: Arc<AtomicUsize>,
}

impl RemoteHybridSolver {
    pub fn new(client: Arc<dyn HybridSampler>) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transport calls that have not returned yet, including abandoned ones.
    pub fn pending_workers(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for RemoteHybridSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteHybridSolver")
            .field("timeout", &self.timeout)
            .field("pending_workers", &self.pending_workers())
            .finish_non_exhaustive()
    }
}

impl Sampler for RemoteHybridSolver {
    fn name(&self) -> &'static str {
        "remote_hybrid"
    }

    fn sample(&self, model: &QuboModel) -> Result<Sample, SolverError> {
        let request = HybridRequest::from_model(model, self.timeout);
        info!(
            variables = model.num_variables(),
            terms = model.len(),
            "submitting remote hybrid job"
        );

        let (tx, rx) = mpsc::channel();
        let client = Arc::clone(&self.client);
        let pending = Arc::clone(&self.pending);
        pending.fetch_add(1, Ordering::SeqCst);
        thread::spawn(move || {
            let result = client.submit(&request);
            pending.fetch_sub(1, Ordering::SeqCst);
            if tx.send(result).is_err() {
                debug!("remote answer arrived after the deadline, discarded");
            }
        });

        let response = match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SolverError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::Unavailable(
                "remote worker exited without a response".into(),
            )),
        };
        let response = response.inspect_err(|e| warn!(error = %e, "remote hybrid solve failed"))?;
        sample_from_response(model, &response)
    }
}

fn sample_from_response(model: &QuboModel, response: &HybridResponse) -> Result<Sample, SolverError> {
    let mut values = Vec::with_capacity(model.num_variables());
    for label in model.labels() {
        match response.sample.get(label) {
            Some(&v) if v <= 1 => values.push(v),
            Some(&v) => {
                return Err(SolverError::MalformedResponse(format!(
                    "variable {} has non-binary value {}",
                    label, v
                )))
            }
            None => {
                return Err(SolverError::MalformedResponse(format!(
                    "variable {} missing from sample",
                    label
                )))
            }
        }
    }
    Ok(Sample::new(values, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Fixed(Result<HybridResponse, SolverError>);

    impl HybridSampler for Fixed {
        fn submit(&self, _request: &HybridRequest) -> Result<HybridResponse, SolverError> {
            self.0.clone()
        }
    }

    struct Slow(Duration);

    impl HybridSampler for Slow {
        fn submit(&self, _request: &HybridRequest) -> Result<HybridResponse, SolverError> {
            thread::sleep(self.0);
            Ok(HybridResponse {
                sample: BTreeMap::new(),
                energy: None,
            })
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<HybridRequest>>);

    impl HybridSampler for Recording {
        fn submit(&self, request: &HybridRequest) -> Result<HybridResponse, SolverError> {
            self.0.lock().unwrap().push(request.clone());
            let sample = request.linear.keys().map(|k| (k.clone(), 0)).collect();
            Ok(HybridResponse {
                sample,
                energy: Some(0.0),
            })
        }
    }

    fn model() -> QuboModel {
        let mut q = QuboModel::new(2).with_labels(vec!["x_0_0".into(), "x_0_1".into()]);
        q.add(0, 0, -2.0);
        q.add(1, 1, -1.5);
        q.add(0, 1, 4.0);
        q
    }

    fn response(pairs: &[(&str, u8)]) -> HybridResponse {
        HybridResponse {
            sample: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            energy: None,
        }
    }

    #[test]
    fn test_request_uses_labels() {
        let req = HybridRequest::from_model(&model(), Duration::from_secs(30));
        assert_eq!(req.linear.get("x_0_0"), Some(&-2.0));
        assert_eq!(req.linear.get("x_0_1"), Some(&-1.5));
        assert_eq!(req.quadratic, vec![("x_0_0".into(), "x_0_1".into(), 4.0)]);
        assert_eq!(req.time_limit_secs, 30);
    }

    #[test]
    fn test_remote_success_maps_labels() {
        let solver = RemoteHybridSolver::new(Arc::new(Fixed(Ok(response(&[
            ("x_0_0", 1),
            ("x_0_1", 0),
        ])))));
        let s = solver.sample(&model()).unwrap();
        assert_eq!(s.values(), &[1, 0]);
        assert_eq!(s.energy(), -2.0);
    }

    #[test]
    fn test_remote_errors_propagate() {
        for err in [
            SolverError::Unauthorized("bad token".into()),
            SolverError::QuotaExceeded("monthly limit".into()),
            SolverError::Unavailable("connection refused".into()),
        ] {
            let solver = RemoteHybridSolver::new(Arc::new(Fixed(Err(err.clone()))));
            assert_eq!(solver.sample(&model()).unwrap_err(), err);
        }
    }

    #[test]
    fn test_remote_timeout() {
        let solver = RemoteHybridSolver::new(Arc::new(Slow(Duration::from_millis(500))))
            .with_timeout(Duration::from_millis(20));
        assert_eq!(
            solver.sample(&model()).unwrap_err(),
            SolverError::Timeout(Duration::from_millis(20))
        );
    }

    struct Gated(Mutex<mpsc::Receiver<()>>);

    impl HybridSampler for Gated {
        fn submit(&self, _request: &HybridRequest) -> Result<HybridResponse, SolverError> {
            let _ = self.0.lock().unwrap().recv();
            Err(SolverError::Unavailable("released".into()))
        }
    }

    #[test]
    fn test_abandoned_worker_finishes_after_release() {
        let (release, gate) = mpsc::channel();
        let solver = RemoteHybridSolver::new(Arc::new(Gated(Mutex::new(gate))))
            .with_timeout(Duration::from_millis(20));
        assert!(matches!(
            solver.sample(&model()),
            Err(SolverError::Timeout(_))
        ));
        assert_eq!(solver.pending_workers(), 1);

        release.send(()).unwrap();
        let mut waited = 0;
        while solver.pending_workers() > 0 && waited < 200 {
            thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        assert_eq!(solver.pending_workers(), 0);
    }

    #[test]
    fn test_missing_variable_is_malformed() {
        let solver = RemoteHybridSolver::new(Arc::new(Fixed(Ok(response(&[("x_0_0", 1)])))));
        assert!(matches!(
            solver.sample(&model()),
            Err(SolverError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_binary_value_is_malformed() {
        let solver = RemoteHybridSolver::new(Arc::new(Fixed(Ok(response(&[
            ("x_0_0", 2),
            ("x_0_1", 0),
        ])))));
        assert!(matches!(
            solver.sample(&model()),
            Err(SolverError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_reaches_transport() {
        let recorder = Arc::new(Recording::default());
        let solver = RemoteHybridSolver::new(recorder.clone());
        solver.sample(&model()).unwrap();
        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].linear.len(), 2);
    }

    #[test]
    fn test_response_json_without_energy() {
        let r: HybridResponse = serde_json::from_str(r#"{"sample":{"x_0_0":1}}"#).unwrap();
        assert_eq!(r.energy, None);
        assert_eq!(r.sample.get("x_0_0"), Some(&1));
    }
}
