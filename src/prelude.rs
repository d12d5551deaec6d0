//! Exports the fitters, their inputs, and their options.
//!
pub use crate::sample::{
    // Inputs
    FeatureMatrix,
    Observation,
    BinaryObservation,
    ProbabilityObservation,
    BinaryOutcomes,
    ProbabilityOutcomes,
};


pub use crate::fit::{
    // Fitters
    fit_binary,
    fit_probabilistic,

    // Options & results
    FitOptions,
    StartingPoint,
    FittedModel,
};


pub use crate::formulation::{
    BinaryFormulation,
    ProbabilisticFormulation,
};


pub use crate::solver::{
    Backend,
    SolverOptions,
};


pub use crate::error::{
    FitError,
    Result,
};
