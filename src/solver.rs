//! Backends that solve a [`Model`].
//!
//! A linear model is solved as a single linear program.
//! A nonlinear model is solved by the prox-linear SQP in [`sqp`],
//! whose subproblems are convex quadratic programs.
//! Both use the interior point solver of `clarabel`.
mod assembly;
mod linear;
mod options;
mod solution;
mod sqp;

use crate::error::{FitError, Result};
use crate::model::Model;

pub use options::{Backend, SolverOptions};
pub use solution::Solution;

/// Solve `model` with the backend selected by `options`.
pub fn solve(model: &Model, options: &SolverOptions) -> Result<Solution> {
    options.validate()?;

    let is_linear = model.is_linear();
    log::debug!(
        "[{}] backend = {:?}, linear model = {is_linear}",
        model.name(),
        options.backend,
    );

    match options.backend {
        Backend::Auto if is_linear => {
            linear::solve_linear(model, options)
        },
        Backend::Auto | Backend::Nonlinear => {
            sqp::solve_nonlinear(model, options)
        },
        Backend::Linear if is_linear => {
            linear::solve_linear(model, options)
        },
        Backend::Linear => {
            log::warn!("[{}] linear backend requested for a nonlinear model", model.name());
            Err(FitError::InvalidConfig(format!(
                "model `{}` has a nonlinear constraint \
                but the linear backend was requested",
                model.name()
            )))
        },
    }
}
