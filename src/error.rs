//! Error types for mogwo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error reported by an objective function for a single decision vector
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ObjectiveError {
    /// Human readable failure description
    pub message: String,
}

impl ObjectiveError {
    /// Create a new objective error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ObjectiveError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ObjectiveError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Top-level error type for optimization runs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MogwoError {
    /// Lower bound exceeds upper bound on some dimension
    #[error("Invalid bounds on dimension {dimension}: lower ({lower}) must be <= upper ({upper})")]
    InvalidBounds {
        dimension: usize,
        lower: f64,
        upper: f64,
    },

    /// A vector had a different length than expected
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The archive could never hold a solution
    #[error("Degenerate archive: {0}")]
    DegenerateArchive(String),

    /// The objective function failed for a population member
    #[error("Objective evaluation failed for member {index}: {source}")]
    ObjectiveEvaluation {
        /// Index of the member within the evaluated batch
        index: usize,
        /// Underlying failure
        #[source]
        source: ObjectiveError,
    },

    /// The objective function returned NaN or an infinite value
    #[error("Objective function returned a non-finite value for member {index}")]
    NonFiniteObjective { index: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An operation was invoked in the wrong search state
    #[error("Invalid search state: {0}")]
    InvalidState(String),
}

/// Result type alias for optimization operations
pub type MogwoResult<T> = Result<T, MogwoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bounds_display() {
        let err = MogwoError::InvalidBounds {
            dimension: 2,
            lower: 1.0,
            upper: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid bounds on dimension 2: lower (1) must be <= upper (0)"
        );
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = MogwoError::DimensionMismatch {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 2, got 3");
    }

    #[test]
    fn test_objective_error_wrapped() {
        let err = MogwoError::ObjectiveEvaluation {
            index: 4,
            source: ObjectiveError::new("solver diverged"),
        };
        assert_eq!(
            err.to_string(),
            "Objective evaluation failed for member 4: solver diverged"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_objective_error_from_str() {
        let err: ObjectiveError = "boom".into();
        assert_eq!(err.message, "boom");
    }
}
