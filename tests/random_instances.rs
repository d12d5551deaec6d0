use admitfit::prelude::*;

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Uniform};


const N_INSTANCES: u64 = 5;
const N_ROWS: usize = 40;
const N_FEATURES: usize = 3;


fn random_matrix(rng: &mut StdRng) -> FeatureMatrix {
    let unif = Uniform::new(0f64, 1f64);
    let rows = (0..N_ROWS).map(|_| {
            (0..N_FEATURES).map(|_| unif.sample(rng)).collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    FeatureMatrix::from_rows(&rows).unwrap()
}


/// Labels from a hidden linear score with 20% of them flipped.
fn random_labels(rng: &mut StdRng, matrix: &FeatureMatrix) -> BinaryOutcomes {
    let unif = Uniform::new(0f64, 1f64);
    let hidden = [0.5, 0.3, 0.2];
    let labels = matrix.rows()
        .map(|row| {
            let score = row.iter().zip(hidden).map(|(f, w)| f * w).sum::<f64>();
            let flip = unif.sample(rng) < 0.2;
            (score >= 0.5) != flip
        })
        .collect::<Vec<_>>();
    BinaryOutcomes::new(&labels[..])
}


/// Properties on random instances.
#[cfg(test)]
pub mod random_instance_tests {
    use super::*;

    #[test]
    fn binary_lp_properties() {
        for seed in 0..N_INSTANCES {
            let mut rng = StdRng::seed_from_u64(seed);
            let matrix = random_matrix(&mut rng);
            let outcomes = random_labels(&mut rng, &matrix);
            let opts = FitOptions::new(N_FEATURES).fix_exponent(1f64);

            let fitted = fit_binary(&matrix, &outcomes, &opts).unwrap();

            let sum = fitted.weights.iter().sum::<f64>();
            assert!((sum - 1f64).abs() < 1e-6, "seed {seed}: sum(w) = {sum}");
            assert!(fitted.weights.iter().all(|w| *w > -1e-7));
            assert!(fitted.cutoff >= -1e-7);

            let iter = matrix.rows().zip(outcomes.iter()).enumerate();
            for (i, (row, admitted)) in iter {
                let score = fitted.score(row).unwrap();
                let violation = if admitted {
                    (fitted.cutoff - score).max(0f64)
                } else {
                    (score - fitted.cutoff).max(0f64)
                };
                assert!(
                    (fitted.slacks[i] - violation).abs() < 1e-5,
                    "seed {seed}, row {i}: slack {} vs violation {violation}",
                    fitted.slacks[i]
                );
            }
        }
    }

    #[test]
    fn probabilistic_lp_properties() {
        for seed in 0..N_INSTANCES {
            let mut rng = StdRng::seed_from_u64(100 + seed);
            let matrix = random_matrix(&mut rng);
            let unif = Uniform::new_inclusive(0f64, 1f64);
            let probabilities = (0..N_ROWS).map(|_| unif.sample(&mut rng))
                .collect::<Vec<_>>();
            let outcomes = ProbabilityOutcomes::new(probabilities).unwrap();
            let opts = FitOptions::new(N_FEATURES).fix_exponent(1f64);

            let fitted = fit_probabilistic(&matrix, &outcomes, &opts).unwrap();

            let sum = fitted.weights.iter().sum::<f64>();
            assert!((sum - 1f64).abs() < 1e-6, "seed {seed}: sum(w) = {sum}");

            let mismatches = fitted.mismatches.as_ref().unwrap();
            for (i, y) in outcomes.iter().enumerate() {
                let slack = fitted.slacks[i];
                let expected = (slack * (1f64 - y)).max(-slack * y);
                assert!(
                    (mismatches[i] - expected).abs() < 1e-5,
                    "seed {seed}, row {i}: {} vs {expected}", mismatches[i]
                );
            }
        }
    }

    #[test]
    fn free_exponent_never_worsens_the_start() {
        let mut rng = StdRng::seed_from_u64(7);
        let matrix = random_matrix(&mut rng);
        let outcomes = random_labels(&mut rng, &matrix);
        let opts = FitOptions::new(N_FEATURES);

        let formulation = BinaryFormulation::build(&matrix, &outcomes, &opts)
            .unwrap();
        let start = formulation.model().start_objective().unwrap();
        let fitted = formulation.solve().unwrap();

        assert!(fitted.objective <= start);
        assert!(fitted.exponent <= 1f64 + 1e-6);
        let sum = fitted.weights.iter().sum::<f64>();
        assert!((sum - 1f64).abs() < 1e-6);
    }
}
