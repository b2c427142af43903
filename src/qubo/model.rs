//! Symmetric QUBO coefficient map.

use std::collections::BTreeMap;

/// Quadratic unconstrained binary objective over `num_variables` binaries.
///
/// Coefficients are keyed by unordered variable pairs, stored as
/// `(min, max)`; a self-pair `(i, i)` holds the linear term of `i`.
/// Contributions to the same pair accumulate additively.
///
/// The objective of a binary assignment `x` is
///
/// ```text
/// E(x) = Σ_(i,j) q_ij · x_i · x_j        (x_i · x_i = x_i)
/// ```
///
/// # Examples
///
/// ```
/// use u_corridor::qubo::QuboModel;
///
/// let mut q = QuboModel::new(2);
/// q.add(0, 0, -2.0);
/// q.add(1, 1, -2.0);
/// q.add(0, 1, 2.0);
/// q.add(1, 0, 2.0);
/// assert_eq!(q.get(0, 1), 4.0);
/// assert_eq!(q.energy(&[1, 0]), -2.0);
/// assert_eq!(q.energy(&[1, 1]), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuboModel {
    num_variables: usize,
    labels: Vec<String>,
    coefficients: BTreeMap<(usize, usize), f64>,
}

impl QuboModel {
    /// Creates an all-zero model.
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            labels: (0..num_variables).map(|i| format!("x{}", i)).collect(),
            coefficients: BTreeMap::new(),
        }
    }

    /// Replaces the variable labels.
    ///
    /// Missing labels fall back to `x{i}`; extra labels are dropped.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        let mut labels = labels;
        labels.truncate(self.num_variables);
        for i in labels.len()..self.num_variables {
            labels.push(format!("x{}", i));
        }
        self.labels = labels;
        self
    }

    /// Adds `value` to the coefficient of the unordered pair `{i, j}`.
    ///
    /// Grows the model if either index is new.
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        let key = if i <= j { (i, j) } else { (j, i) };
        let needed = key.1 + 1;
        if needed > self.num_variables {
            for v in self.num_variables..needed {
                self.labels.push(format!("x{}", v));
            }
            self.num_variables = needed;
        }
        *self.coefficients.entry(key).or_insert(0.0) += value;
    }

    /// Coefficient of `{i, j}`, zero if never set.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let key = if i <= j { (i, j) } else { (j, i) };
        self.coefficients.get(&key).copied().unwrap_or(0.0)
    }

    /// Linear term of variable `i`.
    pub fn linear(&self, i: usize) -> f64 {
        self.get(i, i)
    }

    /// Number of binary variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns `true` if no coefficient has been stored.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Label of variable `i`.
    pub fn label(&self, i: usize) -> Option<&str> {
        self.labels.get(i).map(String::as_str)
    }

    /// All labels in variable order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterates `(i, j, coefficient)` with `i <= j`, in ascending pair order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.coefficients.iter().map(|(&(i, j), &q)| (i, j, q))
    }

    /// Objective value of a 0/1 assignment.
    ///
    /// Entries beyond `sample.len()` count as 0.
    pub fn energy(&self, sample: &[u8]) -> f64 {
        let x = |i: usize| f64::from(sample.get(i).copied().unwrap_or(0));
        self.iter().map(|(i, j, q)| q * x(i) * x(j)).sum()
    }

    /// Linear terms and symmetric neighbour lists, for fast flip evaluation.
    pub(crate) fn adjacency(&self) -> Adjacency {
        let mut linear = vec![0.0; self.num_variables];
        let mut neighbors = vec![Vec::new(); self.num_variables];
        for (i, j, q) in self.iter() {
            if i == j {
                linear[i] += q;
            } else {
                neighbors[i].push((j, q));
                neighbors[j].push((i, q));
            }
        }
        Adjacency { linear, neighbors }
    }
}

/// Sparse view of a model for local moves.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    pub linear: Vec<f64>,
    pub neighbors: Vec<Vec<(usize, f64)>>,
}

impl Adjacency {
    /// Energy change from flipping variable `i` in `state`.
    pub fn flip_delta(&self, state: &[u8], i: usize) -> f64 {
        let field: f64 = self.linear[i]
            + self.neighbors[i]
                .iter()
                .map(|&(j, q)| q * f64::from(state[j]))
                .sum::<f64>();
        if state[i] == 0 {
            field
        } else {
            -field
        }
    }

    pub fn len(&self) -> usize {
        self.linear.len()
    }
}
