//! A prox-linear sequential quadratic programming method.
//!
//! At the current point `x_k` every score term is replaced by
//! its first-order expansion and the quadratic program
//!
//! ```txt
//! min  c^T z + μ/2 ‖z_I - x_k,I‖²
//! s.t. linearized constraints,
//!      l ≤ z ≤ u
//! ```
//!
//! is solved, where `I` is the set of non-dependent variables.
//! The dependent variables of the solution are recomputed from the rest,
//! which makes every accepted point feasible.
//! A step is accepted if it achieves at least
//! [`ACCEPTANCE_RATIO`] of the predicted decrease `c^T x_k - c^T z`;
//! otherwise `μ` grows and the subproblem is solved again.
//! The solver stops once the predicted decrease is negligible
//! with `μ` no larger than its initial value.
use crate::constants::*;
use crate::error::{FitError, Result};
use crate::logger::IterationLogger;
use crate::model::Model;
use super::{assembly, Solution, SolverOptions};
use super::assembly::SolveMode;

/// Outcome of the stopping test of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Converged,
    /// The decrease is small only because `μ` has grown.
    ResetProximal,
    Continue,
}

/// The predicted decrease of the proximal subproblem shrinks like `1/μ`.
/// A small decrease certifies stationarity only
/// while `μ` is at most its initial value.
fn stopping_rule(
    feasible: bool,
    predicted: f64,
    merit: f64,
    mu: f64,
    options: &SolverOptions,
) -> Stop
{
    if !feasible || predicted > options.tolerance * (1f64 + merit.abs()) {
        return Stop::Continue;
    }
    if mu > options.proximal_weight {
        Stop::ResetProximal
    } else {
        Stop::Converged
    }
}

pub(super) fn solve_nonlinear(model: &Model, options: &SolverOptions)
    -> Result<Solution>
{
    let logger = IterationLogger::new(model.name(), options.verbose);
    logger.print_header(model.n_vars(), model.n_constrs());

    let mut x = model.start();
    model.refresh_dependents(&mut x[..])?;

    let mut merit = model.objective().eval(&x[..]);
    let mut mu = options.proximal_weight;
    // The merit comparison is meaningful only between feasible points.
    let mut feasible = model.max_violation(&x[..]) <= options.tolerance.sqrt();
    let mut predicted = f64::INFINITY;
    let mut status = String::new();

    for iter in 1..=options.max_iter {
        let rows = model.linearize(&x[..])?;
        let problem = assembly::assemble(model, &rows[..], Some((&x[..], mu)));
        let outcome = assembly::solve(
            model, &rows[..], problem, options, SolveMode::Subproblem
        )?;
        status = outcome.status;

        let mut trial = outcome.x;
        predicted = merit - model.objective().eval(&trial[..]);

        match stopping_rule(feasible, predicted, merit, mu, options) {
            Stop::Converged => {
                let status = format!("Converged ({status})");
                logger.print_footer(&status, iter, merit);
                return Ok(Solution::new(x, merit, iter, model.is_linear(), status));
            },
            Stop::ResetProximal => {
                log::debug!(
                    "[{}] small decrease at mu = {mu:.1e}; \
                    resetting mu to {:.1e}",
                    model.name(),
                    options.proximal_weight,
                );
                mu = options.proximal_weight;
                continue;
            },
            Stop::Continue => {},
        }

        let trial_merit = match model.refresh_dependents(&mut trial[..]) {
            Ok(()) => model.objective().eval(&trial[..]),
            Err(e) => {
                log::debug!("[{}] trial point rejected: {e}", model.name());
                f64::INFINITY
            },
        };

        let accepted = trial_merit.is_finite()
            && (!feasible || merit - trial_merit >= ACCEPTANCE_RATIO * predicted);
        logger.print_row(iter, trial_merit, predicted, mu, accepted);

        if accepted {
            x = trial;
            merit = trial_merit;
            feasible = true;
            mu = (mu * PROXIMAL_SHRINK).max(MIN_PROXIMAL_WEIGHT);
        } else {
            mu *= PROXIMAL_EXPAND;
            if mu > MAX_PROXIMAL_WEIGHT {
                return Err(FitError::SolverNonconvergence {
                    iterations: iter,
                    residual: predicted,
                    status: format!("proximal weight exceeded ({status})"),
                });
            }
        }
    }

    Err(FitError::SolverNonconvergence {
        iterations: options.max_iter,
        residual: predicted,
        status: format!("MaxIterations ({status})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_decrease_converges_at_the_initial_weight() {
        let options = SolverOptions::default();
        let mu = options.proximal_weight;
        assert_eq!(stopping_rule(true, 0f64, 1f64, mu, &options), Stop::Converged);
        assert_eq!(
            stopping_rule(true, 0f64, 1f64, mu * PROXIMAL_SHRINK, &options),
            Stop::Converged
        );
    }

    #[test]
    fn small_decrease_under_a_grown_weight_is_not_convergence() {
        let options = SolverOptions::default();
        let mu = options.proximal_weight * PROXIMAL_EXPAND.powi(10);
        assert_eq!(
            stopping_rule(true, 1e-12, 1f64, mu, &options),
            Stop::ResetProximal
        );
    }

    #[test]
    fn large_decrease_or_infeasible_start_continues() {
        let options = SolverOptions::default();
        let mu = options.proximal_weight;
        assert_eq!(stopping_rule(true, 1e-2, 1f64, mu, &options), Stop::Continue);
        assert_eq!(stopping_rule(false, 0f64, 1f64, mu, &options), Stop::Continue);
    }
}
