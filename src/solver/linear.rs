use crate::error::Result;
use crate::model::Model;
use super::{assembly, Solution, SolverOptions};
use super::assembly::SolveMode;

/// Solve a linear model with a single conic solve.
/// The linearization at the starting point is exact
/// since every constraint is affine.
pub(super) fn solve_linear(model: &Model, options: &SolverOptions)
    -> Result<Solution>
{
    let x0 = model.start();
    let rows = model.linearize(&x0[..])?;
    let problem = assembly::assemble(model, &rows[..], None);
    let outcome = assembly::solve(
        model, &rows[..], problem, options, SolveMode::Linear
    )?;

    let objective = model.objective().eval(&outcome.x[..]);
    log::info!(
        "[{}] LP solved in {} iterations. objective = {objective:.6e} ({})",
        model.name(),
        outcome.iterations,
        outcome.status,
    );

    Ok(Solution::new(
        outcome.x, objective, outcome.iterations, true, outcome.status
    ))
}
