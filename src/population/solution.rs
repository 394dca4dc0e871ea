//! Solution type
//!
//! A decision vector paired with its objective vector.

use serde::{Deserialize, Serialize};

use crate::pareto::dominates;

/// An evaluated candidate solution
///
/// Immutable once constructed: moving a search agent creates a new
/// `Solution` rather than editing an existing one, so archive members can
/// never alias population state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    decision: Vec<f64>,
    objectives: Vec<f64>,
}

impl Solution {
    /// Create a new solution
    pub fn new(decision: Vec<f64>, objectives: Vec<f64>) -> Self {
        Self {
            decision,
            objectives,
        }
    }

    /// Decision vector
    pub fn decision(&self) -> &[f64] {
        &self.decision
    }

    /// Objective vector (minimized)
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Number of objectives
    pub fn num_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Check if this solution Pareto-dominates another
    pub fn dominates(&self, other: &Self) -> bool {
        dominates(&self.objectives, &other.objectives)
    }

    /// Split into `(decision, objectives)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.decision, self.objectives)
    }
}

impl AsRef<[f64]> for Solution {
    /// Objective-space view, so solution slices feed the Pareto primitives directly
    fn as_ref(&self) -> &[f64] {
        &self.objectives
    }
}
