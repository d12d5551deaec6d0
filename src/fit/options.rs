use serde::{Serialize, Deserialize};

use crate::checkers;
use crate::constants::*;
use crate::error::{FitError, Result};
use crate::solver::{Backend, SolverOptions};

fn default_exponent_upper_bound() -> f64 {
    DEFAULT_EXPONENT_UPPER_BOUND
}

fn default_start_exponent() -> f64 {
    DEFAULT_START_EXPONENT
}

fn default_start_cutoff() -> f64 {
    DEFAULT_START_CUTOFF
}

/// Starting point of the solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingPoint {
    /// Starting weights. `None` means the uniform weights `1/T`.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Starting exponent `ρ`. Ignored when the exponent is fixed.
    #[serde(default = "default_start_exponent")]
    pub exponent: f64,
    /// Starting cutoff `p`.
    #[serde(default = "default_start_cutoff")]
    pub cutoff: f64,
}

impl Default for StartingPoint {
    fn default() -> Self {
        Self {
            weights: None,
            exponent: DEFAULT_START_EXPONENT,
            cutoff: DEFAULT_START_CUTOFF,
        }
    }
}

impl StartingPoint {
    /// Returns the starting weights for `n_features` features.
    pub fn weights_or_uniform(&self, n_features: usize) -> Vec<f64> {
        match &self.weights {
            Some(w) => w.clone(),
            None => vec![1f64 / n_features as f64; n_features],
        }
    }
}

/// Options of both fitters.
///
/// ```
/// use admitfit::FitOptions;
///
/// let opts = FitOptions::from_json(r#"{"n_features": 2}"#).unwrap();
/// assert_eq!(opts.exponent_upper_bound, 1.0);
/// assert_eq!(opts.starting_point.weights_or_uniform(2), vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Number of features `T`.
    pub n_features: usize,
    /// Upper bound on the exponent. At most `1`.
    #[serde(default = "default_exponent_upper_bound")]
    pub exponent_upper_bound: f64,
    /// Pins the exponent to the given value.
    /// `Some(1.0)` turns both variants into linear programs.
    #[serde(default)]
    pub fixed_exponent: Option<f64>,
    /// Starting point.
    #[serde(default)]
    pub starting_point: StartingPoint,
    /// Options passed to the backend.
    #[serde(default)]
    pub solver: SolverOptions,
}

impl FitOptions {
    /// Default options for `n_features` features.
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            exponent_upper_bound: DEFAULT_EXPONENT_UPPER_BOUND,
            fixed_exponent: None,
            starting_point: StartingPoint::default(),
            solver: SolverOptions::default(),
        }
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let opts = serde_json::from_str(json)?;
        Ok(opts)
    }

    /// Serialize the options as JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Set the upper bound on the exponent.
    pub fn exponent_upper_bound(mut self, ub: f64) -> Self {
        self.exponent_upper_bound = ub;
        self
    }

    /// Pin the exponent to `rho`.
    pub fn fix_exponent(mut self, rho: f64) -> Self {
        self.fixed_exponent = Some(rho);
        self
    }

    /// Let the exponent be a decision variable.
    pub fn free_exponent(mut self) -> Self {
        self.fixed_exponent = None;
        self
    }

    /// Set the starting weights.
    pub fn start_weights(mut self, weights: Vec<f64>) -> Self {
        self.starting_point.weights = Some(weights);
        self
    }

    /// Set the starting exponent.
    pub fn start_exponent(mut self, rho: f64) -> Self {
        self.starting_point.exponent = rho;
        self
    }

    /// Set the starting cutoff.
    pub fn start_cutoff(mut self, cutoff: f64) -> Self {
        self.starting_point.cutoff = cutoff;
        self
    }

    /// Replace the solver options.
    pub fn solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    /// Set the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.solver.backend = backend;
        self
    }

    /// Set the iteration limit of the backend.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.solver.max_iter = max_iter;
        self
    }

    /// Set the tolerance of the backend.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    /// Print the progress table or not.
    pub fn verbose(mut self, flag: bool) -> Self {
        self.solver.verbose = flag;
        self
    }

    /// Returns `true` if the exponent is pinned to `1`.
    pub fn is_linear(&self) -> bool {
        self.fixed_exponent == Some(1f64)
    }

    /// Check the options without looking at any data.
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(FitError::InvalidConfig(
                "the number of features must be positive".into()
            ));
        }
        checkers::exponent_upper_bound(self.exponent_upper_bound)?;
        match self.fixed_exponent {
            Some(rho) => checkers::exponent(rho, self.exponent_upper_bound)?,
            None => checkers::exponent(
                self.starting_point.exponent, self.exponent_upper_bound
            )?,
        }

        let weights = self.starting_point.weights_or_uniform(self.n_features);
        checkers::simplex(&weights[..], self.n_features)?;
        checkers::cutoff(self.starting_point.cutoff)?;

        self.solver.validate()
    }
}
