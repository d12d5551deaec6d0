//! Error taxonomy of the crate.
//!
//! Every failure propagates to the caller; nothing is retried.
//! Infeasibility and non-convergence are distinct variants
//! so that a caller never mistakes one for the other.
use thiserror::Error;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, FitError>;

/// Failure kinds of the crate.
#[derive(Debug, Error)]
pub enum FitError {
    /// Malformed or mismatched input dimensions,
    /// a missing column, or a non-numeric column.
    /// Raised before any solver invocation.
    #[error("schema error: {0}")]
    Schema(String),

    /// The backend reports that no feasible point exists.
    #[error(
        "infeasible problem (solver status: {status}, \
        max constraint violation: {max_violation:.3e})"
    )]
    Infeasible {
        /// Status reported by the backend.
        status: String,
        /// Largest constraint violation at the last iterate.
        max_violation: f64,
    },

    /// The backend stopped before reaching its convergence criteria.
    #[error(
        "solver did not converge after {iterations} iterations \
        (residual: {residual:.3e}, status: {status})"
    )]
    SolverNonconvergence {
        /// Number of iterations performed.
        iterations: usize,
        /// Last predicted decrease or constraint residual.
        residual: f64,
        /// Status reported by the backend.
        status: String,
    },

    /// A power mean is undefined for the given features and exponent,
    /// e.g., a negative feature raised to a non-integer exponent.
    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    /// The options cannot describe a valid problem.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Options or results could not be read or written as JSON.
    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl FitError {
    /// Returns `true` if this error is [`FitError::Infeasible`].
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }

    /// Returns `true` if this error is [`FitError::SolverNonconvergence`].
    pub fn is_nonconvergence(&self) -> bool {
        matches!(self, Self::SolverNonconvergence { .. })
    }
}
