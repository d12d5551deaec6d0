use admitfit::prelude::*;


fn excerpt() -> (FeatureMatrix, ProbabilityOutcomes) {
    let rows = vec![
        vec![0.965,  0.5975],
        vec![0.6675, 0.1325],
        vec![0.455,  0.1725],
        vec![0.6425, 0.47  ],
        vec![0.3825, 0.1675],
    ];
    let matrix = FeatureMatrix::from_rows(&rows).unwrap();
    let outcomes = ProbabilityOutcomes::new(
        vec![0.92, 0.76, 0.72, 0.8, 0.65]
    ).unwrap();
    (matrix, outcomes)
}


/// Objective of the 5-row excerpt with `ρ = 1`.
const LINEAR_OPTIMUM: f64 = 0.098771875;


fn check_fitted(
    fitted: &FittedModel,
    matrix: &FeatureMatrix,
    outcomes: &ProbabilityOutcomes,
    tol: f64,
)
{
    let sum = fitted.weights.iter().sum::<f64>();
    assert!((sum - 1f64).abs() < 1e-6, "sum(w) = {sum}");
    assert!(fitted.exponent <= 1f64 + 1e-6);
    assert!(fitted.cutoff >= -1e-7);

    let mismatches = fitted.mismatches.as_ref().unwrap();
    let iter = matrix.rows().zip(outcomes.iter()).enumerate();
    for (i, (row, y)) in iter {
        let slack = fitted.slacks[i];
        let residual = fitted.score(row).unwrap() - fitted.cutoff;
        assert!((slack - residual).abs() < tol, "slack[{i}] = {slack}");

        let expected = (slack * (1f64 - y)).max(-slack * y);
        assert!(
            (mismatches[i] - expected).abs() < tol,
            "mismatch[{i}] = {}, expected {expected}", mismatches[i]
        );
    }
    let total = mismatches.iter().sum::<f64>();
    assert!((fitted.objective - total).abs() < tol * matrix.shape().0 as f64);
}


/// Tests for the probabilistic variant.
#[cfg(test)]
pub mod probabilistic_tests {
    use super::*;

    #[test]
    fn excerpt_linear_program() {
        let (matrix, outcomes) = excerpt();
        let opts = FitOptions::new(2).fix_exponent(1f64);

        let fitted = fit_probabilistic(&matrix, &outcomes, &opts).unwrap();

        assert!(fitted.is_linear);
        assert!(
            (fitted.objective - LINEAR_OPTIMUM).abs() < 1e-4,
            "objective = {}", fitted.objective
        );
        check_fitted(&fitted, &matrix, &outcomes, 1e-5);
    }

    #[test]
    fn excerpt_free_exponent() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (matrix, outcomes) = excerpt();
        let opts = FitOptions::new(2);

        let formulation = ProbabilisticFormulation::build(
            &matrix, &outcomes, &opts
        ).unwrap();
        let start = formulation.model().start_objective().unwrap();
        let fitted = formulation.solve().unwrap();

        println!("{}", fitted.to_json().unwrap());
        assert!(!fitted.is_linear);
        assert!(fitted.objective <= start, "{} > {start}", fitted.objective);
        // The exponent runs to its upper bound,
        // where the fit coincides with the linear program.
        assert!(
            (fitted.objective - LINEAR_OPTIMUM).abs() < 1e-4,
            "objective = {}", fitted.objective
        );
        assert!(
            (fitted.exponent - 1f64).abs() < 1e-4,
            "exponent = {}", fitted.exponent
        );
        check_fitted(&fitted, &matrix, &outcomes, 1e-9);
    }

    #[test]
    fn certain_outcomes_penalize_the_wrong_side_only() {
        // y = 1 costs nothing above the cutoff,
        // y = 0 costs nothing below it.
        let rows = vec![vec![0.9, 0.9], vec![0.1, 0.1]];
        let matrix = FeatureMatrix::from_rows(&rows).unwrap();
        let outcomes = ProbabilityOutcomes::new(vec![1f64, 0f64]).unwrap();
        let opts = FitOptions::new(2).fix_exponent(1f64);

        let fitted = fit_probabilistic(&matrix, &outcomes, &opts).unwrap();

        assert!(fitted.objective.abs() < 1e-6);
        assert!(fitted.cutoff > 0.1 - 1e-6 && fitted.cutoff < 0.9 + 1e-6);
        check_fitted(&fitted, &matrix, &outcomes, 1e-5);
    }
}
