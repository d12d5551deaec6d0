use fixedbitset::FixedBitSet;
use polars::prelude::*;

use crate::checkers;
use crate::error::{FitError, Result};
use super::feature_matrix::numeric_column;
use super::observation::Observation;

/// Outcomes of the binary variant.
/// The set of admitted observations is held as a bit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOutcomes {
    admitted: FixedBitSet,
    len: usize,
}

impl BinaryOutcomes {
    /// Construct from boolean labels; `true` means admitted.
    pub fn new(labels: &[bool]) -> Self {
        let len = labels.len();
        let mut admitted = FixedBitSet::with_capacity(len);
        for (i, &y) in labels.iter().enumerate() {
            if y { admitted.insert(i); }
        }
        Self { admitted, len }
    }

    /// Construct from integer labels in `{0, 1}`.
    pub fn from_labels(labels: &[i64]) -> Result<Self> {
        let labels = labels.iter()
            .enumerate()
            .map(|(i, &y)| match y {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(FitError::Schema(format!(
                    "binary outcome of observation {i} must be 0 or 1. got {y}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(&labels[..]))
    }

    /// Construct from the outcome column of observation records.
    pub fn from_observations(observations: &[Observation<bool>]) -> Self {
        let labels = observations.iter()
            .map(|obs| obs.outcome)
            .collect::<Vec<_>>();
        Self::new(&labels[..])
    }

    /// Construct from the column `name` of `df`.
    /// The column must be boolean or numeric with values in `{0, 1}`.
    pub fn from_dataframe(df: &DataFrame, name: &str) -> Result<Self> {
        let series = df.column(name)
            .map_err(|_| FitError::Schema(format!("column `{name}` is missing")))?;

        if matches!(series.dtype(), DataType::Boolean) {
            let labels = series.bool()
                .map_err(|e| FitError::Schema(e.to_string()))?
                .into_iter()
                .enumerate()
                .map(|(i, y)| {
                    y.ok_or_else(|| FitError::Schema(format!(
                        "column `{name}` has a missing value at row {i}"
                    )))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::new(&labels[..]));
        }

        let labels = numeric_column(df, name)?
            .into_iter()
            .enumerate()
            .map(|(i, y)| {
                if y == 0f64 || y == 1f64 {
                    Ok(y as i64)
                } else {
                    Err(FitError::Schema(format!(
                        "binary outcome of observation {i} \
                        must be 0 or 1. got {y}"
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_labels(&labels[..])
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there is no observation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the `i`-th observation was admitted.
    pub fn is_admitted(&self, i: usize) -> bool {
        self.admitted.contains(i)
    }

    /// Returns the number of admitted observations.
    pub fn n_admitted(&self) -> usize {
        self.admitted.count_ones(..)
    }

    /// Iterate over the labels in observation order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.admitted.contains(i))
    }
}

/// Outcomes of the probabilistic variant:
/// the admission probability of each observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityOutcomes {
    probabilities: Vec<f64>,
}

impl ProbabilityOutcomes {
    /// Construct from admission probabilities.
    /// Every value must lie in `[0, 1]`.
    pub fn new(probabilities: Vec<f64>) -> Result<Self> {
        for (i, &y) in probabilities.iter().enumerate() {
            checkers::probability(i, y)?;
        }
        Ok(Self { probabilities })
    }

    /// Construct from the outcome column of observation records.
    pub fn from_observations(observations: &[Observation<f64>])
        -> Result<Self>
    {
        let probabilities = observations.iter()
            .map(|obs| obs.outcome)
            .collect::<Vec<_>>();
        Self::new(probabilities)
    }

    /// Construct from the numeric column `name` of `df`.
    pub fn from_dataframe(df: &DataFrame, name: &str) -> Result<Self> {
        Self::new(numeric_column(df, name)?)
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns `true` if there is no observation.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Returns the probabilities as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities[..]
    }

    /// Iterate over the probabilities in observation order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.probabilities.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_labels() {
        let outcomes = BinaryOutcomes::from_labels(&[0, 1, 1, 1, 0]).unwrap();
        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes.n_admitted(), 3);
        assert!(!outcomes.is_admitted(0));
        assert!(outcomes.is_admitted(3));
        assert_eq!(
            outcomes.iter().collect::<Vec<_>>(),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn binary_labels_outside_01() {
        let err = BinaryOutcomes::from_labels(&[0, 1, -1]).unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }

    #[test]
    fn binary_labels_from_dataframe() {
        let df = df!(
            "admit" => &[true, false, true],
            "coded" => &[1i64, 0, 1],
            "bad"   => &[1i64, 2, 0],
        ).unwrap();
        let a = BinaryOutcomes::from_dataframe(&df, "admit").unwrap();
        let b = BinaryOutcomes::from_dataframe(&df, "coded").unwrap();
        assert_eq!(a, b);
        assert!(BinaryOutcomes::from_dataframe(&df, "bad").is_err());
        assert!(BinaryOutcomes::from_dataframe(&df, "missing").is_err());
    }

    #[test]
    fn probabilities_must_be_in_unit_interval() {
        assert!(ProbabilityOutcomes::new(vec![0.92, 0.76, 0.0, 1.0]).is_ok());
        let err = ProbabilityOutcomes::new(vec![0.5, 1.2]).unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }
}
