//! The weighted power mean
//!
//! ```text
//!     M_ρ(w, f) = ( Σ_t w[t] f[t]^ρ )^(1/ρ)
//! ```
//!
//! and its partial derivatives with respect to `w` and `ρ`.
//! For `|ρ|` below [`GEOMETRIC_MEAN_THRESHOLD`]
//! the weighted geometric mean `exp( Σ_t w[t] ln f[t] / Σ_t w[t] )`
//! is used instead.
use crate::constants::GEOMETRIC_MEAN_THRESHOLD;
use crate::error::{FitError, Result};
use super::expr::Var;

/// The exponent of a power mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exponent {
    /// The exponent is a decision variable.
    Free(Var),
    /// The exponent is a fixed number.
    Fixed(f64),
}

impl Exponent {
    /// Returns the value of the exponent at `x`.
    #[inline(always)]
    pub fn value(&self, x: &[f64]) -> f64 {
        match self {
            Self::Free(v) => x[v.index()],
            Self::Fixed(rho) => *rho,
        }
    }
}

/// Value and gradient of a power mean at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerMean {
    /// `M_ρ(w, f)`
    pub value: f64,
    /// `∂M / ∂w[t]`
    pub d_weights: Vec<f64>,
    /// `∂M / ∂ρ`.
    /// This is `NaN` when the derivative was not requested.
    pub d_exponent: f64,
}

impl PowerMean {
    fn zero(n_features: usize) -> Self {
        Self {
            value: 0f64,
            d_weights: vec![0f64; n_features],
            d_exponent: 0f64,
        }
    }
}

/// Evaluate the power mean only.
pub fn power_mean(weights: &[f64], rho: f64, features: &[f64]) -> Result<f64> {
    let pm = power_mean_with_gradient(weights, rho, features, false)?;
    Ok(pm.value)
}

/// Evaluate the power mean and its gradient.
/// `∂M/∂ρ` is computed only if `with_exponent` is `true`,
/// since it needs `ln f[t]` and hence nonnegative features.
///
/// Conventions for zero features:
/// - for `ρ > 0`, a zero feature contributes nothing to the sum.
/// - for `ρ ≤ 0`, a zero feature with positive weight makes
///   the mean (and its gradient) zero.
///
/// Fails with [`FitError::NumericDomain`] if the inner sum is negative
/// for `ρ ≠ 1` or if any returned quantity is not finite.
pub fn power_mean_with_gradient(
    weights: &[f64],
    rho: f64,
    features: &[f64],
    with_exponent: bool,
) -> Result<PowerMean>
{
    let n_features = features.len();
    if weights.len() != n_features {
        return Err(FitError::Schema(format!(
            "{} weights for {n_features} features", weights.len()
        )));
    }

    if !rho.is_finite() {
        return Err(FitError::NumericDomain(format!(
            "power mean exponent must be finite. got {rho}"
        )));
    }

    let vanishes = weights.iter()
        .zip(features)
        .any(|(&w, &f)| w > 0f64 && f == 0f64);
    if rho < GEOMETRIC_MEAN_THRESHOLD && vanishes {
        return Ok(PowerMean::zero(n_features));
    }

    let pm = if rho.abs() < GEOMETRIC_MEAN_THRESHOLD {
        geometric_mean(weights, features, with_exponent)?
    } else {
        arithmetic_power_mean(weights, rho, features, with_exponent)?
    };

    let finite = pm.value.is_finite()
        && pm.d_weights.iter().all(|g| g.is_finite())
        && (!with_exponent || pm.d_exponent.is_finite());
    if !finite {
        return Err(FitError::NumericDomain(format!(
            "power mean is not finite at rho = {rho}"
        )));
    }
    Ok(pm)
}

fn arithmetic_power_mean(
    weights: &[f64],
    rho: f64,
    features: &[f64],
    with_exponent: bool,
) -> Result<PowerMean>
{
    let powers = features.iter()
        .map(|&f| if f == 0f64 { 0f64 } else { f.powf(rho) })
        .collect::<Vec<f64>>();

    let sum = weights.iter()
        .zip(&powers[..])
        .map(|(w, p)| w * p)
        .sum::<f64>();

    // The arithmetic mean is linear in `w`.
    if rho == 1f64 {
        let d_exponent = if with_exponent {
            d_rho(weights, features, &powers[..], rho, sum, sum)
        } else {
            f64::NAN
        };
        return Ok(PowerMean { value: sum, d_weights: powers, d_exponent });
    }

    if sum < 0f64 {
        return Err(FitError::NumericDomain(format!(
            "Σ w[t] f[t]^ρ = {sum} is negative at rho = {rho}"
        )));
    }
    if sum == 0f64 {
        return Ok(PowerMean::zero(features.len()));
    }

    let value = sum.powf(rho.recip());
    let scale = value / (rho * sum);
    let d_weights = powers.iter()
        .map(|p| scale * p)
        .collect::<Vec<_>>();

    let d_exponent = if with_exponent {
        d_rho(weights, features, &powers[..], rho, sum, value)
    } else {
        f64::NAN
    };

    Ok(PowerMean { value, d_weights, d_exponent })
}

/// `∂M/∂ρ = M · [ Σ_t w[t] f[t]^ρ ln f[t] / (ρ S) - ln S / ρ² ]`
fn d_rho(
    weights: &[f64],
    features: &[f64],
    powers: &[f64],
    rho: f64,
    sum: f64,
    value: f64,
) -> f64
{
    if sum <= 0f64 {
        return 0f64;
    }
    let weighted_log = weights.iter()
        .zip(features)
        .zip(powers)
        .filter(|((_, f), _)| **f > 0f64)
        .map(|((w, f), p)| w * p * f.ln())
        .sum::<f64>();

    value * (weighted_log / (rho * sum) - sum.ln() / rho.powi(2))
}

fn geometric_mean(weights: &[f64], features: &[f64], with_exponent: bool)
    -> Result<PowerMean>
{
    let total = weights.iter().sum::<f64>();
    if total <= 0f64 {
        return Err(FitError::NumericDomain(format!(
            "geometric mean needs a positive total weight. got {total}"
        )));
    }
    if let Some(t) = features.iter().position(|&f| f <= 0f64) {
        return Err(FitError::NumericDomain(format!(
            "geometric mean is not differentiable at feature {t} = {}",
            features[t]
        )));
    }

    let logs = features.iter().map(|f| f.ln()).collect::<Vec<_>>();
    let mean_log = weights.iter()
        .zip(&logs[..])
        .map(|(w, l)| w * l)
        .sum::<f64>() / total;
    let value = mean_log.exp();

    let d_weights = logs.iter()
        .map(|l| value * (l - mean_log) / total)
        .collect::<Vec<_>>();

    let d_exponent = if with_exponent {
        let second = weights.iter()
            .zip(&logs[..])
            .map(|(w, l)| w * l.powi(2))
            .sum::<f64>() / total;
        value * 0.5 * (second - mean_log.powi(2))
    } else {
        f64::NAN
    };

    Ok(PowerMean { value, d_weights, d_exponent })
}

/// `coef · M_ρ(w, f)` for one observation,
/// where `w` and possibly `ρ` are decision variables
/// and `f` is the feature row of the observation.
#[derive(Debug, Clone)]
pub struct ScoreTerm {
    coef: f64,
    weights: Vec<Var>,
    exponent: Exponent,
    features: Vec<f64>,
}

impl ScoreTerm {
    /// Construct the term `M_ρ(w, f)`.
    /// Fails with [`FitError::Schema`] unless
    /// there is one weight per feature.
    pub fn new(weights: &[Var], exponent: Exponent, features: &[f64])
        -> Result<Self>
    {
        if weights.len() != features.len() {
            return Err(FitError::Schema(format!(
                "score term has {} weights for {} features",
                weights.len(),
                features.len()
            )));
        }
        Ok(Self {
            coef: 1f64,
            weights: weights.to_vec(),
            exponent,
            features: features.to_vec(),
        })
    }

    /// Multiply the term by `c`.
    pub fn scaled(mut self, c: f64) -> Self {
        self.coef *= c;
        self
    }

    /// Returns the exponent.
    pub fn exponent(&self) -> Exponent {
        self.exponent
    }

    /// Returns the feature row.
    pub fn features(&self) -> &[f64] {
        &self.features[..]
    }

    /// The term is affine in the variables
    /// iff the exponent is fixed to `1`.
    pub fn is_affine(&self) -> bool {
        matches!(self.exponent, Exponent::Fixed(rho) if rho == 1f64)
    }

    fn weights_at(&self, x: &[f64]) -> Vec<f64> {
        self.weights.iter().map(|v| x[v.index()]).collect()
    }

    /// Evaluate the term at `x`.
    pub fn eval(&self, x: &[f64]) -> Result<f64> {
        let w = self.weights_at(x);
        let rho = self.exponent.value(x);
        let value = power_mean(&w[..], rho, &self.features[..])?;
        Ok(self.coef * value)
    }

    /// Returns the value of the term at `x` and its gradient
    /// as `(variable, partial derivative)` pairs.
    pub fn linearize(&self, x: &[f64]) -> Result<(f64, Vec<(Var, f64)>)> {
        let w = self.weights_at(x);
        let rho = self.exponent.value(x);
        let free = matches!(self.exponent, Exponent::Free(_));
        let pm = power_mean_with_gradient(
            &w[..], rho, &self.features[..], free
        )?;

        let mut grad = self.weights.iter()
            .zip(pm.d_weights)
            .map(|(&v, g)| (v, self.coef * g))
            .collect::<Vec<_>>();
        if let Exponent::Free(v) = self.exponent {
            grad.push((v, self.coef * pm.d_exponent));
        }

        Ok((self.coef * pm.value, grad))
    }
}
