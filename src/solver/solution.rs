use serde::{Serialize, Deserialize};

use crate::model::Var;

/// The point returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    values: Vec<f64>,
    objective: f64,
    iterations: usize,
    is_linear: bool,
    status: String,
}

impl Solution {
    pub(crate) fn new(
        values: Vec<f64>,
        objective: f64,
        iterations: usize,
        is_linear: bool,
        status: String,
    ) -> Self
    {
        Self { values, objective, iterations, is_linear, status }
    }

    /// Returns the value of `var`.
    #[inline(always)]
    pub fn value(&self, var: Var) -> f64 {
        self.values[var.index()]
    }

    /// Returns the values of all variables.
    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }

    /// Returns the objective value.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Returns the number of iterations.
    /// For a nonlinear model this is the number of solved subproblems.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the model was linear.
    pub fn is_linear(&self) -> bool {
        self.is_linear
    }

    /// Returns the final status reported by the backend.
    pub fn status(&self) -> &str {
        &self.status
    }
}
