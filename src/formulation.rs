//! Formulations of the two variants on top of [`Model`](crate::model::Model).
//!
//! Both replace a piecewise loss by epigraph variables:
//! the choice of which inequality an observation gets
//! is made here, at construction time.
mod parameters;
mod binary;
mod probabilistic;

pub use parameters::ScoreParameters;
pub use binary::BinaryFormulation;
pub use probabilistic::ProbabilisticFormulation;
