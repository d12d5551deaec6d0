#![warn(missing_docs)]

//!
//! A crate that fits a weighted power-mean admission score
//!
//! ```txt
//!     score(f) = ( Σ_t w[t] f[t]^ρ )^(1/ρ)
//! ```
//!
//! to observed admission outcomes.
//! The weights `w` lie on the probability simplex,
//! the exponent satisfies `ρ ≤ 1`,
//! and an observation is admitted iff its score reaches a cutoff `p ≥ 0`.
//!
//! This crate includes two variants.
//!
//! - Binary variant
//!     Each observation is admitted or rejected.
//!     The fit minimizes the total distance by which misclassified
//!     observations cross the cutoff.
//!     See [`fit_binary`].
//!
//!
//! - Probabilistic variant
//!     Each observation carries an admission probability `y`.
//!     With the signed residual `ξ = score - p`,
//!     the fit minimizes `Σ max{ ξ (1 - y), -ξ y }`.
//!     See [`fit_probabilistic`].
//!
//! Both losses are piecewise, so each variant is solved as
//! an epigraph reformulation built on [`Model`].
//! When `ρ` is fixed to `1`, every constraint is affine
//! and the problem is a linear program.
//! Otherwise it is solved by sequential quadratic programming.
//!
//! ```no_run
//! use admitfit::prelude::*;
//!
//! let rows = vec![
//!     vec![0.965,  0.5975],
//!     vec![0.6675, 0.1325],
//!     vec![0.455,  0.1725],
//!     vec![0.6425, 0.47  ],
//!     vec![0.3825, 0.1675],
//! ];
//! let matrix = FeatureMatrix::from_rows(&rows).unwrap();
//! let outcomes = ProbabilityOutcomes::new(vec![0.92, 0.76, 0.72, 0.8, 0.65])
//!     .unwrap();
//!
//! let opts = FitOptions::new(2)
//!     .tolerance(1e-7)
//!     .verbose(true);
//! let fitted = fit_probabilistic(&matrix, &outcomes, &opts).unwrap();
//! println!("{}", fitted.to_json().unwrap());
//! ```

pub mod checkers;
pub mod constants;
pub mod error;
pub mod sample;
pub mod model;
pub mod solver;
pub mod formulation;
pub mod fit;
pub mod prelude;

mod logger;


pub use error::{FitError, Result};

pub use sample::{
    FeatureMatrix,
    Observation,
    BinaryObservation,
    ProbabilityObservation,
    BinaryOutcomes,
    ProbabilityOutcomes,
};

pub use model::{
    Model,
    Var,
    LinExpr,
    Expr,
    Sense,
    Exponent,
    ScoreTerm,
};

pub use solver::{
    Backend,
    SolverOptions,
    Solution,
};

pub use formulation::{
    ScoreParameters,
    BinaryFormulation,
    ProbabilisticFormulation,
};

pub use fit::{
    FitOptions,
    StartingPoint,
    FittedModel,
    fit_binary,
    fit_probabilistic,
};
