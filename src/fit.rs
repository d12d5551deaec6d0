//! Entry points of the crate.
//!
//! Each call builds a fresh model, solves it, and returns
//! the fitted parameters or the failure reported by the backend.
mod fitted;
mod options;

use crate::error::Result;
use crate::formulation::{BinaryFormulation, ProbabilisticFormulation};
use crate::sample::{FeatureMatrix, BinaryOutcomes, ProbabilityOutcomes};

pub use fitted::FittedModel;
pub use options::{FitOptions, StartingPoint};

/// Fit the binary variant.
///
/// ```no_run
/// use admitfit::prelude::*;
///
/// let rows = vec![
///     vec![0.0533, 0.4733],
///     vec![0.7033, 0.2767],
///     vec![1.0,    0.8767],
///     vec![0.6267, 0.06  ],
///     vec![0.2533, 0.12  ],
/// ];
/// let matrix = FeatureMatrix::from_rows(&rows).unwrap();
/// let outcomes = BinaryOutcomes::from_labels(&[0, 1, 1, 1, 0]).unwrap();
///
/// let fitted = fit_binary(&matrix, &outcomes, &FitOptions::new(2)).unwrap();
/// println!("w = {:?}, rho = {}, p = {}", fitted.weights, fitted.exponent, fitted.cutoff);
/// ```
pub fn fit_binary(
    matrix: &FeatureMatrix,
    outcomes: &BinaryOutcomes,
    opts: &FitOptions,
) -> Result<FittedModel>
{
    BinaryFormulation::build(matrix, outcomes, opts)?.solve()
}

/// Fit the probabilistic variant.
pub fn fit_probabilistic(
    matrix: &FeatureMatrix,
    outcomes: &ProbabilityOutcomes,
    opts: &FitOptions,
) -> Result<FittedModel>
{
    ProbabilisticFormulation::build(matrix, outcomes, opts)?.solve()
}
