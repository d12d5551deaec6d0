use crate::error::{FitError, Result};
use crate::fit::FitOptions;
use crate::model::{
    Model,
    Var,
    LinExpr,
    Sense,
    Exponent,
    ScoreTerm,
};
use crate::sample::FeatureMatrix;

/// The decision variables shared by both variants:
/// the weights `w`, the exponent `ρ`, and the cutoff `p`.
#[derive(Debug, Clone)]
pub struct ScoreParameters {
    /// `w[0], ..., w[T-1]`
    pub weights: Vec<Var>,
    /// `ρ`
    pub exponent: Exponent,
    /// `p`
    pub cutoff: Var,
}

impl ScoreParameters {
    /// Add the parameters to `model`:
    ///
    /// ```txt
    /// Σ_t w[t] = 1,  w ≥ 0,  ρ ≤ ub,  p ≥ 0.
    /// ```
    ///
    /// `ρ` is a constant if `opts.fixed_exponent` is set.
    pub(crate) fn add_to(model: &mut Model, opts: &FitOptions) -> Self {
        let start = opts.starting_point.weights_or_uniform(opts.n_features);
        let weights = start.into_iter()
            .enumerate()
            .map(|(t, w)| {
                model.add_var(format!("w[{t}]"), 0f64, f64::INFINITY, w)
            })
            .collect::<Vec<_>>();

        let exponent = match opts.fixed_exponent {
            Some(rho) => Exponent::Fixed(rho),
            None => {
                let rho = model.add_var(
                    "rho",
                    f64::NEG_INFINITY,
                    opts.exponent_upper_bound,
                    opts.starting_point.exponent,
                );
                Exponent::Free(rho)
            },
        };

        let cutoff = model.add_var(
            "cutoff", 0f64, f64::INFINITY, opts.starting_point.cutoff
        );

        let mut simplex = LinExpr::sum(weights.iter().copied());
        simplex.add_constant(-1f64);
        model.add_constr("simplex", simplex, Sense::Equal);

        Self { weights, exponent, cutoff }
    }

    /// The composite score of the observation with `features`.
    pub fn score(&self, features: &[f64]) -> Result<ScoreTerm> {
        ScoreTerm::new(&self.weights[..], self.exponent, features)
    }
}

/// Checks shared by both variants.
/// Run before any variable is created.
pub(crate) fn check_inputs(
    matrix: &FeatureMatrix,
    n_outcomes: usize,
    opts: &FitOptions,
) -> Result<()>
{
    opts.validate()?;

    let (n_rows, n_features) = matrix.shape();
    if n_features != opts.n_features {
        return Err(FitError::Schema(format!(
            "feature table has {n_features} columns \
            but the options declare {} features",
            opts.n_features
        )));
    }
    crate::checkers::n_outcomes(n_rows, n_outcomes)?;

    // A negative feature is fine only for an integer exponent.
    match opts.fixed_exponent {
        Some(rho) if rho.fract() == 0f64 => Ok(()),
        _ => matrix.check_nonnegative(),
    }
}
