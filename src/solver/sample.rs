//! Binary assignment returned by a solver.

use std::collections::BTreeMap;

use crate::qubo::QuboModel;

/// A 0/1 value per model variable plus its objective value.
///
/// # Examples
///
/// ```
/// use u_corridor::qubo::QuboModel;
/// use u_corridor::solver::Sample;
///
/// let mut q = QuboModel::new(2);
/// q.add(0, 0, -1.0);
/// let s = Sample::new(vec![1, 0], &q);
/// assert_eq!(s.energy(), -1.0);
/// assert_eq!(s.get(0), 1);
/// assert_eq!(s.get(7), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<u8>,
    energy: f64,
}

impl Sample {
    /// Wraps an assignment, computing its energy under `model`.
    ///
    /// Non-zero entries are normalised to 1.
    pub fn new(values: Vec<u8>, model: &QuboModel) -> Self {
        let values: Vec<u8> = values.into_iter().map(|v| u8::from(v != 0)).collect();
        let energy = model.energy(&values);
        Self { values, energy }
    }

    /// Value of variable `var`; variables outside the sample read as 0.
    pub fn get(&self, var: usize) -> u8 {
        self.values.get(var).copied().unwrap_or(0)
    }

    /// All values in variable order.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Objective value under the model it was built for.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Number of variables set to 1.
    pub fn num_selected(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }

    /// Values keyed by the model's variable labels.
    pub fn to_labeled(&self, model: &QuboModel) -> BTreeMap<String, u8> {
        model
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), self.get(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_normalises_values() {
        let q = QuboModel::new(3);
        let s = Sample::new(vec![0, 5, 1], &q);
        assert_eq!(s.values(), &[0, 1, 1]);
        assert_eq!(s.num_selected(), 2);
    }

    #[test]
    fn test_sample_labeled() {
        let q = QuboModel::new(2).with_labels(vec!["x_0_0".into(), "x_0_1".into()]);
        let s = Sample::new(vec![0, 1], &q);
        let labeled = s.to_labeled(&q);
        assert_eq!(labeled.get("x_0_1"), Some(&1));
        assert_eq!(labeled.get("x_0_0"), Some(&0));
    }
}
