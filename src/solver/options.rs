use serde::{Serialize, Deserialize};

use crate::constants::*;
use crate::error::{FitError, Result};

/// Which algorithm solves a [`Model`](crate::model::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Linear program if the model is linear,
    /// sequential quadratic programming otherwise.
    #[default]
    Auto,
    /// Linear program. Fails on a nonlinear model.
    Linear,
    /// Sequential quadratic programming, even for a linear model.
    Nonlinear,
}

/// Options passed to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Backend selection.
    pub backend: Backend,
    /// Stationarity tolerance of the nonlinear solver.
    /// For a linear model, the gap and feasibility tolerances of the LP.
    pub tolerance: f64,
    /// Maximal number of subproblems the nonlinear solver solves.
    /// For a linear model, the interior point iteration cap of the LP.
    pub max_iter: usize,
    /// Maximal number of interior point iterations per conic solve.
    pub qp_max_iter: u32,
    /// Initial weight of the proximal term of the nonlinear solver.
    pub proximal_weight: f64,
    /// Print a progress table to stdout.
    pub verbose: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            qp_max_iter: DEFAULT_QP_MAX_ITER,
            proximal_weight: DEFAULT_PROXIMAL_WEIGHT,
            verbose: false,
        }
    }
}

impl SolverOptions {
    /// Construct the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the stationarity tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration limit.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the iteration limit of each conic solve.
    pub fn qp_max_iter(mut self, qp_max_iter: u32) -> Self {
        self.qp_max_iter = qp_max_iter;
        self
    }

    /// Set the initial proximal weight.
    pub fn proximal_weight(mut self, weight: f64) -> Self {
        self.proximal_weight = weight;
        self
    }

    /// Print the progress table or not.
    pub fn verbose(mut self, flag: bool) -> Self {
        self.verbose = flag;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0f64 {
            return Err(FitError::InvalidConfig(format!(
                "solver tolerance must be positive. got {}",
                self.tolerance
            )));
        }
        if self.max_iter == 0 || self.qp_max_iter == 0 {
            return Err(FitError::InvalidConfig(
                "iteration limits must be positive".into()
            ));
        }
        if !self.proximal_weight.is_finite() || self.proximal_weight <= 0f64 {
            return Err(FitError::InvalidConfig(format!(
                "proximal weight must be positive. got {}",
                self.proximal_weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_json() {
        let opts: SolverOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SolverOptions::default());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn backend_names() {
        let opts: SolverOptions = serde_json::from_str(
            r#"{"backend": "nonlinear", "max_iter": 10}"#
        ).unwrap();
        assert_eq!(opts.backend, Backend::Nonlinear);
        assert_eq!(opts.max_iter, 10);
    }

    #[test]
    fn rejects_nonpositive_tolerance() {
        let opts = SolverOptions::new().tolerance(0f64);
        assert!(matches!(opts.validate(), Err(FitError::InvalidConfig(_))));
    }
}
