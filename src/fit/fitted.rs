use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::formulation::ScoreParameters;
use crate::model::{Exponent, Var, power_mean};
use crate::sample::{FeatureMatrix, BinaryOutcomes};
use crate::solver::Solution;

/// Fitted parameters read back from a solved model.
/// Values are the raw solver output; nothing is rounded or clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    /// Weights `w`.
    pub weights: Vec<f64>,
    /// Exponent `ρ`.
    pub exponent: f64,
    /// Cutoff `p`.
    pub cutoff: f64,
    /// Objective value.
    pub objective: f64,
    /// Per-observation slack `ξ`.
    pub slacks: Vec<f64>,
    /// Per-observation mismatch `d`. Probabilistic variant only.
    pub mismatches: Option<Vec<f64>>,
    /// `true` iff the exponent was fixed to `1`.
    pub is_linear: bool,
    /// Iterations spent by the backend.
    pub iterations: usize,
}

impl FittedModel {
    pub(crate) fn extract(
        solution: &Solution,
        params: &ScoreParameters,
        slacks: &[Var],
        mismatches: Option<&[Var]>,
    ) -> Self
    {
        let values = |vars: &[Var]| {
            vars.iter().map(|&v| solution.value(v)).collect::<Vec<_>>()
        };

        let exponent = match params.exponent {
            Exponent::Free(v) => solution.value(v),
            Exponent::Fixed(rho) => rho,
        };

        Self {
            weights: values(&params.weights[..]),
            exponent,
            cutoff: solution.value(params.cutoff),
            objective: solution.objective(),
            slacks: values(slacks),
            mismatches: mismatches.map(values),
            is_linear: solution.is_linear(),
            iterations: solution.iterations(),
        }
    }

    /// The composite score `M_ρ(w, features)`.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        power_mean(&self.weights[..], self.exponent, features)
    }

    /// Admit iff the score reaches the cutoff.
    pub fn predict(&self, features: &[f64]) -> Result<bool> {
        Ok(self.score(features)? >= self.cutoff)
    }

    /// Number of observations whose prediction differs from the label.
    pub fn misclassified(
        &self,
        matrix: &FeatureMatrix,
        outcomes: &BinaryOutcomes,
    ) -> Result<usize>
    {
        crate::checkers::n_outcomes(matrix.shape().0, outcomes.len())?;
        let mut count = 0;
        for (row, admitted) in matrix.rows().zip(outcomes.iter()) {
            if self.predict(row)? != admitted {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Serialize the fitted model as JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }
}
