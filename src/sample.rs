//! Observation records, the dense feature table,
//! and the outcome vectors of both model variants.

mod feature_matrix;
mod observation;
mod outcome;

pub use feature_matrix::FeatureMatrix;
pub use observation::{
    Observation,
    BinaryObservation,
    ProbabilityObservation,
};
pub use outcome::{
    BinaryOutcomes,
    ProbabilityOutcomes,
};
