use admitfit::prelude::*;


fn binary() -> (FeatureMatrix, BinaryOutcomes) {
    let rows = vec![
        vec![0.0533, 0.4733],
        vec![0.7033, 0.2767],
        vec![1.0,    0.8767],
        vec![0.6267, 0.06  ],
        vec![0.2533, 0.12  ],
        vec![0.35,   0.6   ],
        vec![0.8,    0.1   ],
    ];
    let matrix = FeatureMatrix::from_rows(&rows).unwrap();
    let outcomes = BinaryOutcomes::from_labels(&[0, 1, 1, 1, 0, 1, 0]).unwrap();
    (matrix, outcomes)
}


fn probabilistic() -> (FeatureMatrix, ProbabilityOutcomes) {
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


/// With `ρ` pinned to `1`, the linear program and
/// the nonlinear solver must agree on the objective value.
#[cfg(test)]
pub mod linear_agreement_tests {
    use super::*;

    #[test]
    fn binary_lp_vs_sqp() {
        let (matrix, outcomes) = binary();
        let opts = FitOptions::new(2).fix_exponent(1f64);

        let lp = fit_binary(
            &matrix, &outcomes, &opts.clone().backend(Backend::Linear)
        ).unwrap();
        let sqp = fit_binary(
            &matrix, &outcomes, &opts.backend(Backend::Nonlinear)
        ).unwrap();

        println!("LP: {}, SQP: {}", lp.objective, sqp.objective);
        assert!(lp.is_linear && sqp.is_linear);
        assert!((lp.objective - sqp.objective).abs() < 1e-4);
    }

    #[test]
    fn probabilistic_lp_vs_sqp() {
        let (matrix, outcomes) = probabilistic();
        let opts = FitOptions::new(2).fix_exponent(1f64);

        let lp = fit_probabilistic(
            &matrix, &outcomes, &opts.clone().backend(Backend::Linear)
        ).unwrap();
        let sqp = fit_probabilistic(
            &matrix, &outcomes, &opts.backend(Backend::Nonlinear)
        ).unwrap();

        println!("LP: {}, SQP: {}", lp.objective, sqp.objective);
        assert!((lp.objective - sqp.objective).abs() < 1e-4);
    }

    #[test]
    fn free_exponent_is_never_linear() {
        let (matrix, outcomes) = probabilistic();
        let opts = FitOptions::new(2).backend(Backend::Linear);

        let err = fit_probabilistic(&matrix, &outcomes, &opts).unwrap_err();
        assert!(matches!(err, FitError::InvalidConfig(_)));
    }
}
