//! Objective function traits
//!
//! This module defines the contract between the optimizer and the problem
//! being solved: a function from a decision vector to an objective vector.

use crate::error::ObjectiveError;

/// Multi-objective function contract
///
/// Maps a decision vector (length `dim`, inside the bounds) to an objective
/// vector of fixed length `m >= 2`. All objectives are minimized. The function
/// must be callable repeatedly and independently.
#[cfg(feature = "parallel")]
pub trait ObjectiveFunction: Send + Sync {
    /// Evaluate all objectives for one decision vector
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError>;

    /// Number of objectives, if known up front
    fn num_objectives(&self) -> Option<usize> {
        None
    }
}

/// Multi-objective function contract
///
/// Maps a decision vector (length `dim`, inside the bounds) to an objective
/// vector of fixed length `m >= 2`. All objectives are minimized. The function
/// must be callable repeatedly and independently.
#[cfg(not(feature = "parallel"))]
pub trait ObjectiveFunction {
    /// Evaluate all objectives for one decision vector
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError>;

    /// Number of objectives, if known up front
    fn num_objectives(&self) -> Option<usize> {
        None
    }
}

/// Infallible closures are objective functions
#[cfg(feature = "parallel")]
impl<F> ObjectiveFunction for F
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError> {
        Ok(self(decision))
    }
}

/// Infallible closures are objective functions
#[cfg(not(feature = "parallel"))]
impl<F> ObjectiveFunction for F
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError> {
        Ok(self(decision))
    }
}

/// Wrapper for closures that can fail
pub struct FallibleObjective<F> {
    f: F,
}

impl<F> FallibleObjective<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, ObjectiveError>,
{
    /// Wrap a fallible closure
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[cfg(feature = "parallel")]
impl<F> ObjectiveFunction for FallibleObjective<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, ObjectiveError> + Send + Sync,
{
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError> {
        (self.f)(decision)
    }
}

#[cfg(not(feature = "parallel"))]
impl<F> ObjectiveFunction for FallibleObjective<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, ObjectiveError>,
{
    fn evaluate(&self, decision: &[f64]) -> Result<Vec<f64>, ObjectiveError> {
        (self.f)(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate_with<O: ObjectiveFunction>(objective: &O, x: &[f64]) -> Vec<f64> {
        objective.evaluate(x).unwrap()
    }

    #[test]
    fn test_closure_objective() {
        let objective = |x: &[f64]| vec![x[0], 1.0 - x[0]];
        assert_eq!(evaluate_with(&objective, &[0.25]), vec![0.25, 0.75]);
        assert_eq!(objective.num_objectives(), None);
    }

    #[test]
    fn test_fallible_objective_propagates() {
        let objective = FallibleObjective::new(|x: &[f64]| {
            if x[0] < 0.0 {
                Err(ObjectiveError::new("negative input"))
            } else {
                Ok(vec![x[0], x[0] * 2.0])
            }
        });
        assert_eq!(objective.evaluate(&[1.0]).unwrap(), vec![1.0, 2.0]);
        assert_eq!(
            objective.evaluate(&[-1.0]).unwrap_err().message,
            "negative input"
        );
    }
}
