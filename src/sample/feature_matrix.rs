use polars::prelude::*;

use std::ops::Index;

use crate::checkers;
use crate::error::{FitError, Result};
use super::observation::Observation;

/// A dense `N × T` feature table.
/// Row `i` holds the features of the `i`-th observation,
/// in the order the observations were given.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Vec<f64>,
    n_rows: usize,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build the table from per-observation feature vectors.
    /// Every row must have the same width as the first one.
    ///
    /// Columns are named `Feat. [1]`, ..., `Feat. [T]`.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self>
        where R: AsRef<[f64]>,
    {
        let n_rows = rows.len();
        let n_features = rows.first()
            .map(|r| r.as_ref().len())
            .unwrap_or(0);
        checkers::shape(n_rows, n_features)?;

        let mut values = Vec::with_capacity(n_rows * n_features);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            checkers::row_width(i, row.len(), n_features)?;
            for (t, &f) in row.iter().enumerate() {
                checkers::feature_value(i, t, f)?;
            }
            values.extend_from_slice(row);
        }

        let names = (1..=n_features).map(|t| format!("Feat. [{t}]"))
            .collect::<Vec<_>>();

        Ok(Self { names, values, n_rows, n_features })
    }

    /// Build the table from observation records, keeping their order.
    pub fn from_observations<Y>(observations: &[Observation<Y>])
        -> Result<Self>
    {
        let rows = observations.iter()
            .map(|obs| &obs.features[..])
            .collect::<Vec<_>>();
        Self::from_rows(&rows)
    }

    /// Build the table from the given numeric columns of a `DataFrame`.
    /// Returns [`FitError::Schema`] if a column is missing,
    /// is not numeric, or contains a null.
    pub fn from_dataframe<S>(df: &DataFrame, columns: &[S]) -> Result<Self>
        where S: AsRef<str>,
    {
        let n_rows = df.height();
        checkers::shape(n_rows, columns.len())?;

        let cols = columns.iter()
            .map(|name| numeric_column(df, name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let rows = (0..n_rows).map(|i| {
                cols.iter().map(|col| col[i]).collect::<Vec<f64>>()
            })
            .collect::<Vec<_>>();

        let mut matrix = Self::from_rows(&rows)?;
        matrix.names = columns.iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        Ok(matrix)
    }

    /// Returns `(# of observations, # of features)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_features)
    }

    /// Returns the number of features `T`.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Returns the column names.
    pub fn names(&self) -> &[String] {
        &self.names[..]
    }

    /// Returns the features of the `i`-th observation.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_features;
        &self.values[start..start + self.n_features]
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.n_features)
    }

    /// Fails with [`FitError::NumericDomain`] if any feature is negative.
    pub fn check_nonnegative(&self) -> Result<()> {
        checkers::nonnegative_features(self.rows())
    }
}

impl Index<(usize, usize)> for FeatureMatrix {
    type Output = f64;
    fn index(&self, (i, t): (usize, usize)) -> &Self::Output {
        &self.values[i * self.n_features + t]
    }
}

/// Read a numeric column of `df` as `f64` values.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)
        .map_err(|_| FitError::Schema(format!("column `{name}` is missing")))?;

    if !series.dtype().is_numeric() {
        return Err(FitError::Schema(format!(
            "column `{name}` is not numeric. got dtype {}",
            series.dtype()
        )));
    }

    let series = series.cast(&DataType::Float64)
        .map_err(|e| FitError::Schema(e.to_string()))?;
    let values = series.f64()
        .map_err(|e| FitError::Schema(e.to_string()))?;

    values.into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| {
                FitError::Schema(format!(
                    "column `{name}` has a missing value at row {i}"
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_observation_order() {
        let rows = vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]];
        let matrix = FeatureMatrix::from_rows(&rows).unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.row(1), &[0.3, 0.4]);
        assert_eq!(matrix[(2, 0)], 0.5);
        assert_eq!(matrix.rows().count(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![0.1, 0.2], vec![0.3]];
        let err = FeatureMatrix::from_rows(&rows).unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let rows = vec![vec![0.1, f64::NAN]];
        assert!(FeatureMatrix::from_rows(&rows).is_err());
    }

    #[test]
    fn reads_numeric_columns() {
        let df = df!(
            "gpa"   => &[0.5, 0.7, 0.9],
            "test"  => &[1i64, 0, 1],
            "label" => &["a", "b", "c"],
        ).unwrap();
        let matrix = FeatureMatrix::from_dataframe(&df, &["gpa", "test"])
            .unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.row(2), &[0.9, 1.0]);
        assert_eq!(matrix.names(), &["gpa".to_string(), "test".to_string()]);

        let err = FeatureMatrix::from_dataframe(&df, &["gpa", "label"])
            .unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));

        let err = FeatureMatrix::from_dataframe(&df, &["gpa", "essay"])
            .unwrap_err();
        assert!(matches!(err, FitError::Schema(_)));
    }
}
