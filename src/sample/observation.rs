use serde::{Serialize, Deserialize};

/// A single observation produced by a data loader.
/// `Y` is `bool` for the binary variant
/// and `f64` (admission probability) for the probabilistic variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation<Y> {
    /// Position of the observation in the loaded table.
    pub index: usize,
    /// Feature values `f[1], ..., f[T]`.
    pub features: Vec<f64>,
    /// Observed outcome.
    pub outcome: Y,
}

/// Observation of the binary variant: admitted (`true`) or rejected.
pub type BinaryObservation = Observation<bool>;

/// Observation of the probabilistic variant.
pub type ProbabilityObservation = Observation<f64>;

impl<Y> Observation<Y> {
    /// Construct a new observation.
    pub fn new(index: usize, features: Vec<f64>, outcome: Y) -> Self {
        Self { index, features, outcome }
    }
}
