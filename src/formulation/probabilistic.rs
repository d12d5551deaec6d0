use crate::error::Result;
use crate::fit::{FitOptions, FittedModel};
use crate::model::{Model, Var, Expr, LinExpr};
use crate::sample::{FeatureMatrix, ProbabilityOutcomes};
use crate::solver::SolverOptions;
use super::parameters::{self, ScoreParameters};

/// The probabilistic variant.
///
/// ```txt
/// min  Σ_n d[n]
/// s.t. ξ[n] = M_ρ(w, f[n]) - p,
///      d[n] ≥ (1 - y[n]) ξ[n],
///      d[n] ≥ -y[n] ξ[n],
///      Σ_t w[t] = 1,
///      w ≥ 0, p ≥ 0, d ≥ 0, ρ ≤ ub.
/// ```
///
/// `ξ[n]` is the signed residual, so the equality keeps the power mean
/// on the left. Raising both sides to the power `ρ` instead gives
/// a problem whose optimum drives `ρ` to `0`, which collapses every
/// score towards `1` regardless of `w` and `p`. The two forms are not
/// interchangeable and only the form above is built.
#[derive(Debug, Clone)]
pub struct ProbabilisticFormulation {
    model: Model,
    params: ScoreParameters,
    slacks: Vec<Var>,
    mismatches: Vec<Var>,
    solver: SolverOptions,
}

impl ProbabilisticFormulation {
    /// Build the model for `matrix` and `outcomes`.
    pub fn build(
        matrix: &FeatureMatrix,
        outcomes: &ProbabilityOutcomes,
        opts: &FitOptions,
    ) -> Result<Self>
    {
        parameters::check_inputs(matrix, outcomes.len(), opts)?;

        let mut model = Model::new("probabilistic");
        let params = ScoreParameters::add_to(&mut model, opts);

        let n_rows = outcomes.len();
        let mut slacks = Vec::with_capacity(n_rows);
        let mut mismatches = Vec::with_capacity(n_rows);
        for (i, (row, y)) in matrix.rows().zip(outcomes.iter()).enumerate() {
            let residual = Expr::score(params.score(row)?)
                .plus(LinExpr::new().term(params.cutoff, -1f64));
            let slack = model.add_defined(format!("slack[{i}]"), residual, Some(i));

            let slack_expr = LinExpr::from_var(slack);
            let mismatch = model.add_epigraph(
                format!("mismatch[{i}]"),
                vec![
                    slack_expr.clone().scaled(1f64 - y).into(),
                    slack_expr.scaled(-y).into(),
                ],
                Some(i),
            );

            slacks.push(slack);
            mismatches.push(mismatch);
        }

        model.set_objective(LinExpr::sum(mismatches.iter().copied()));

        log::debug!(
            "probabilistic model built: {} variables, {} constraints, linear = {}",
            model.n_vars(),
            model.n_constrs(),
            model.is_linear(),
        );

        Ok(Self {
            model,
            params,
            slacks,
            mismatches,
            solver: opts.solver.clone(),
        })
    }

    /// Returns the model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the score parameters.
    pub fn parameters(&self) -> &ScoreParameters {
        &self.params
    }

    /// Returns the signed residual variables in observation order.
    pub fn slacks(&self) -> &[Var] {
        &self.slacks[..]
    }

    /// Returns the mismatch variables in observation order.
    pub fn mismatches(&self) -> &[Var] {
        &self.mismatches[..]
    }

    /// Solve the model and read back the fitted parameters.
    pub fn solve(&self) -> Result<FittedModel> {
        let solution = self.model.solve(&self.solver)?;
        Ok(FittedModel::extract(
            &solution,
            &self.params,
            &self.slacks[..],
            Some(&self.mismatches[..]),
        ))
    }
}
