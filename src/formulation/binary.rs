use crate::error::Result;
use crate::fit::{FitOptions, FittedModel};
use crate::model::{Model, Var, Expr, LinExpr};
use crate::sample::{FeatureMatrix, BinaryOutcomes};
use crate::solver::SolverOptions;
use super::parameters::{self, ScoreParameters};

/// The binary variant.
///
/// ```txt
/// min  Σ_n ξ[n]
/// s.t. M_ρ(w, f[n]) - p ≤ ξ[n],   n rejected,
///      p - M_ρ(w, f[n]) ≤ ξ[n],   n admitted,
///      Σ_t w[t] = 1,
///      w ≥ 0, p ≥ 0, ξ ≥ 0, ρ ≤ ub.
/// ```
///
/// Each observation gets only the inequality its label can violate,
/// so a correctly classified observation has `ξ[n] = 0` at an optimum.
#[derive(Debug, Clone)]
pub struct BinaryFormulation {
    model: Model,
    params: ScoreParameters,
    slacks: Vec<Var>,
    solver: SolverOptions,
}

impl BinaryFormulation {
    /// Build the model for `matrix` and `outcomes`.
    pub fn build(
        matrix: &FeatureMatrix,
        outcomes: &BinaryOutcomes,
        opts: &FitOptions,
    ) -> Result<Self>
    {
        parameters::check_inputs(matrix, outcomes.len(), opts)?;

        let mut model = Model::new("binary");
        let params = ScoreParameters::add_to(&mut model, opts);

        let mut slacks = Vec::with_capacity(outcomes.len());
        for (i, (row, admitted)) in matrix.rows().zip(outcomes.iter()).enumerate() {
            let score = Expr::score(params.score(row)?);
            let cutoff = LinExpr::from_var(params.cutoff);
            // admitted:  ξ ≥ p - score
            // rejected:  ξ ≥ score - p
            let gap = if admitted {
                score.scaled(-1f64).plus(cutoff)
            } else {
                score.plus(cutoff.scaled(-1f64))
            };
            let slack = model.add_epigraph(format!("slack[{i}]"), vec![gap], Some(i));
            slacks.push(slack);
        }

        model.set_objective(LinExpr::sum(slacks.iter().copied()));

        log::debug!(
            "binary model built: {} variables, {} constraints, linear = {}",
            model.n_vars(),
            model.n_constrs(),
            model.is_linear(),
        );

        Ok(Self { model, params, slacks, solver: opts.solver.clone() })
    }

    /// Returns the model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the score parameters.
    pub fn parameters(&self) -> &ScoreParameters {
        &self.params
    }

    /// Returns the slack variables in observation order.
    pub fn slacks(&self) -> &[Var] {
        &self.slacks[..]
    }

    /// Solve the model and read back the fitted parameters.
    pub fn solve(&self) -> Result<FittedModel> {
        let solution = self.model.solve(&self.solver)?;
        Ok(FittedModel::extract(&solution, &self.params, &self.slacks[..], None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;

    fn sample() -> (FeatureMatrix, BinaryOutcomes) {
        let rows = vec![vec![0.2, 0.4], vec![0.8, 0.6], vec![0.5, 0.1]];
        let matrix = FeatureMatrix::from_rows(&rows).unwrap();
        let outcomes = BinaryOutcomes::new(&[false, true, false]);
        (matrix, outcomes)
    }

    #[test]
    fn one_epigraph_row_per_observation() {
        let (matrix, outcomes) = sample();
        let opts = FitOptions::new(2);
        let formulation = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap();
        let model = formulation.model();

        // w[0], w[1], rho, cutoff, 3 slacks
        assert_eq!(model.n_vars(), 7);
        // simplex + 3 slack rows
        assert_eq!(model.n_constrs(), 4);
        assert!(!model.is_linear());
        let observations = model.constraints()
            .iter()
            .filter_map(|c| c.observation)
            .collect::<Vec<_>>();
        assert_eq!(observations, vec![0, 1, 2]);
    }

    #[test]
    fn fixed_exponent_one_is_linear() {
        let (matrix, outcomes) = sample();
        let opts = FitOptions::new(2).fix_exponent(1f64);
        let formulation = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap();
        assert!(formulation.model().is_linear());
        assert_eq!(formulation.model().n_vars(), 6);
    }

    #[test]
    fn start_objective_sums_one_sided_violations() {
        let (matrix, outcomes) = sample();
        let opts = FitOptions::new(2).fix_exponent(1f64).start_cutoff(0.4);
        let formulation = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap();
        // scores are 0.3, 0.7, 0.3; nothing is violated at p = 0.4
        assert_eq!(formulation.model().start_objective().unwrap(), 0f64);

        let opts = opts.start_cutoff(0.8);
        let formulation = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap();
        let objective = formulation.model().start_objective().unwrap();
        assert!((objective - 0.1).abs() < 1e-12);
    }

    #[test]
    fn feature_count_must_match_options() {
        let (matrix, outcomes) = sample();
        let opts = FitOptions::new(3);
        let err = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }

    #[test]
    fn outcome_count_must_match_rows() {
        let (matrix, _) = sample();
        let outcomes = BinaryOutcomes::new(&[true, false]);
        let err = BinaryFormulation::build(&matrix, &outcomes, &FitOptions::new(2))
            .unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }
}
