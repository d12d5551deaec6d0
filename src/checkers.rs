//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data, validity of the starting point.
//! Each function returns an error instead of panicking
//! so that the caller sees the failure kind.

use crate::error::{FitError, Result};
use crate::constants::SIMPLEX_TOLERANCE;

/// Check whether the feature table is non-empty.
#[inline(always)]
pub fn shape(n_rows: usize, n_features: usize) -> Result<()> {
    if n_rows == 0 {
        return Err(FitError::Schema("no observations are given".into()));
    }
    if n_features == 0 {
        return Err(FitError::Schema("observations have no feature".into()));
    }
    Ok(())
}

/// Check whether the `index`-th row has the expected width.
#[inline(always)]
pub fn row_width(index: usize, width: usize, expected: usize)
    -> Result<()>
{
    if width != expected {
        return Err(FitError::Schema(format!(
            "observation {index} has {width} features. expected {expected}"
        )));
    }
    Ok(())
}

/// Check whether the feature value is a finite number.
#[inline(always)]
pub fn feature_value(row: usize, col: usize, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FitError::Schema(format!(
            "feature ({row}, {col}) is not a finite number. got {value}"
        )));
    }
    Ok(())
}

/// Check whether the number of outcomes matches the number of rows.
#[inline(always)]
pub fn n_outcomes(n_rows: usize, n_outcomes: usize) -> Result<()> {
    if n_rows != n_outcomes {
        return Err(FitError::Schema(format!(
            "{n_rows} feature rows but {n_outcomes} outcomes"
        )));
    }
    Ok(())
}

/// Check whether `y` is a probability.
#[inline(always)]
pub fn probability(index: usize, y: f64) -> Result<()> {
    if !(0f64..=1f64).contains(&y) {
        return Err(FitError::Schema(format!(
            "outcome probability of observation {index} \
            must be in [0, 1]. got {y}"
        )));
    }
    Ok(())
}

/// Check whether the upper bound of the exponent is valid.
#[inline(always)]
pub fn exponent_upper_bound(ub: f64) -> Result<()> {
    if !ub.is_finite() || ub > 1f64 {
        return Err(FitError::InvalidConfig(format!(
            "exponent upper bound must be finite and at most 1. got {ub}"
        )));
    }
    Ok(())
}

/// Check whether the exponent respects its upper bound.
#[inline(always)]
pub fn exponent(rho: f64, ub: f64) -> Result<()> {
    if !rho.is_finite() || rho > ub {
        return Err(FitError::InvalidConfig(format!(
            "exponent must be finite and at most {ub}. got {rho}"
        )));
    }
    Ok(())
}

/// Check whether the cutoff is nonnegative.
#[inline(always)]
pub fn cutoff(p: f64) -> Result<()> {
    if !p.is_finite() || p < 0f64 {
        return Err(FitError::InvalidConfig(format!(
            "cutoff must be finite and nonnegative. got {p}"
        )));
    }
    Ok(())
}

/// Check whether `weights` lies on the probability simplex
/// of dimension `n_features`.
#[inline(always)]
pub fn simplex(weights: &[f64], n_features: usize) -> Result<()> {
    if weights.len() != n_features {
        return Err(FitError::InvalidConfig(format!(
            "{} starting weights for {n_features} features",
            weights.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0f64) {
        return Err(FitError::InvalidConfig(format!(
            "starting weights must be nonnegative. got {w}"
        )));
    }
    let sum = weights.iter().sum::<f64>();
    if (sum - 1f64).abs() > SIMPLEX_TOLERANCE {
        return Err(FitError::InvalidConfig(format!(
            "starting weights must sum to 1. sum(weights) = {sum}"
        )));
    }
    Ok(())
}

/// Check whether all features are nonnegative.
/// A negative base raised to a non-integer exponent is undefined,
/// so this check runs whenever the exponent can be non-integer.
#[inline(always)]
pub fn nonnegative_features<'a, I>(rows: I) -> Result<()>
    where I: IntoIterator<Item = &'a [f64]>,
{
    for (i, row) in rows.into_iter().enumerate() {
        if let Some((t, f)) = row.iter().enumerate().find(|(_, f)| **f < 0f64) {
            return Err(FitError::NumericDomain(format!(
                "feature ({i}, {t}) = {f} is negative; \
                the power mean is undefined for a non-integer exponent"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_success_01() {
        assert!(shape(5, 2).is_ok());
    }

    #[test]
    fn test_shape_failure_01() {
        assert!(matches!(shape(0, 2), Err(FitError::Schema(_))));
    }

    #[test]
    fn test_shape_failure_02() {
        assert!(matches!(shape(3, 0), Err(FitError::Schema(_))));
    }

    #[test]
    fn test_probability_success_01() {
        assert!(probability(0, 0f64).is_ok());
        assert!(probability(1, 1f64).is_ok());
        assert!(probability(2, 0.65).is_ok());
    }

    #[test]
    fn test_probability_failure_01() {
        assert!(probability(0, 1.0001).is_err());
        assert!(probability(0, -0.0001).is_err());
        assert!(probability(0, f64::NAN).is_err());
    }

    #[test]
    fn test_exponent_upper_bound_failure_01() {
        assert!(exponent_upper_bound(1.5).is_err());
        assert!(exponent_upper_bound(f64::INFINITY).is_err());
        assert!(exponent_upper_bound(0.8).is_ok());
    }

    #[test]
    fn test_simplex_success_01() {
        assert!(simplex(&[0.25, 0.75], 2).is_ok());
    }

    #[test]
    fn test_simplex_failure_01() {
        assert!(simplex(&[0.5, 0.6], 2).is_err());
    }

    #[test]
    fn test_simplex_failure_02() {
        assert!(simplex(&[1.5, -0.5], 2).is_err());
    }

    #[test]
    fn test_simplex_failure_03() {
        assert!(simplex(&[1f64], 2).is_err());
    }

    #[test]
    fn test_nonnegative_features_failure_01() {
        let rows = [vec![0.1, 0.2], vec![0.3, -0.1]];
        let result = nonnegative_features(rows.iter().map(|r| &r[..]));
        assert!(matches!(result, Err(FitError::NumericDomain(_))));
    }
}
