//! Errors reported at the validating boundary.

use thiserror::Error;

use crate::Float;

/// Validation errors returned by [`crate::integrate()`] and the Python binding.
///
/// The stepping engine never produces these; it assumes its inputs were checked here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("derivative argument is not callable")]
    NotCallable,
    #[error("bad initial vector: {reason}")]
    BadInitialVector { reason: String },
    #[error("step size dt must be finite and positive (got {0})")]
    BadStepSize(Float),
    #[error("horizon tmax must be finite and positive (got {0})")]
    BadHorizon(Float),
    #[error("derivative returned {actual} values, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("trajectory would hold {requested} samples, limit is {limit}")]
    TooManySamples { requested: usize, limit: usize },
}

impl Error {
    pub(crate) fn bad_initial(reason: impl Into<String>) -> Self {
        Error::BadInitialVector {
            reason: reason.into(),
        }
    }
}
