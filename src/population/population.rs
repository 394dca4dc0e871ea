//! Population type
//!
//! This module provides the Population container type together with the
//! seeding schemes and the batch objective evaluation used by the search loop.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{MogwoError, MogwoResult};
use crate::fitness::traits::ObjectiveFunction;
use crate::genome::bounds::MultiBounds;
use crate::population::solution::Solution;

/// How the first generation is seeded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initialization {
    /// Independent uniform draws inside the bounds
    #[default]
    Uniform,
    /// Uniform draws plus their opposite points; the best `pop_size` of the
    /// combined pool survive
    Opposition,
    /// One sample per stratum in every dimension
    LatinHypercube,
}

/// A generation of evaluated solutions
#[derive(Clone, Debug, Default)]
pub struct Population {
    solutions: Vec<Solution>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform random decision vectors
    pub fn random_decisions<R: Rng>(
        size: usize,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        (0..size).map(|_| bounds.sample_vec(rng)).collect()
    }

    /// Latin hypercube decision vectors
    ///
    /// Each dimension is split into `size` equal strata; every stratum is used
    /// exactly once, with the pairing across dimensions shuffled.
    pub fn latin_hypercube<R: Rng>(
        size: usize,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let mut decisions = vec![Vec::with_capacity(bounds.dimension()); size];
        if size == 0 {
            return decisions;
        }
        for b in &bounds.bounds {
            let mut strata: Vec<usize> = (0..size).collect();
            strata.shuffle(rng);
            for (decision, stratum) in decisions.iter_mut().zip(strata) {
                let u = (stratum as f64 + rng.gen::<f64>()) / size as f64;
                decision.push(b.denormalize(u));
            }
        }
        decisions
    }

    /// Evaluate decision vectors sequentially
    ///
    /// `expected_objectives` is the objective count observed so far (if any).
    /// The first failing member aborts the whole batch.
    pub fn evaluate<O>(
        decisions: Vec<Vec<f64>>,
        objective: &O,
        expected_objectives: Option<usize>,
    ) -> MogwoResult<Self>
    where
        O: ObjectiveFunction + ?Sized,
    {
        let results: Vec<_> = decisions.iter().map(|d| objective.evaluate(d)).collect();
        Self::assemble(decisions, results, expected_objectives)
    }

    /// Number of solutions
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Get a solution by index
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.solutions.get(index)
    }

    /// Iterate over the solutions
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.iter()
    }

    /// All solutions
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Number of objectives (None for an empty population)
    pub fn num_objectives(&self) -> Option<usize> {
        self.solutions.first().map(Solution::num_objectives)
    }

    /// Keep only the solutions at `indices`, in that order
    pub fn retain_indices(&mut self, indices: &[usize]) {
        let kept = indices.iter().map(|&i| self.solutions[i].clone()).collect();
        self.solutions = kept;
    }

    /// Mean pairwise Euclidean distance in decision space
    pub fn diversity(&self) -> f64 {
        let mut total_distance = 0.0;
        let mut count = 0usize;
        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                total_distance += crate::pareto::euclidean(
                    self.solutions[i].decision(),
                    self.solutions[j].decision(),
                );
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total_distance / count as f64
        }
    }

    fn assemble(
        decisions: Vec<Vec<f64>>,
        results: Vec<Result<Vec<f64>, crate::error::ObjectiveError>>,
        expected_objectives: Option<usize>,
    ) -> MogwoResult<Self> {
        let mut expected = expected_objectives;
        let mut solutions = Vec::with_capacity(decisions.len());
        for (index, (decision, result)) in decisions.into_iter().zip(results).enumerate() {
            let objectives =
                result.map_err(|source| MogwoError::ObjectiveEvaluation { index, source })?;
            check_objectives(index, &objectives, expected)?;
            expected = Some(objectives.len());
            solutions.push(Solution::new(decision, objectives));
        }
        Ok(Self { solutions })
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl Population {
    /// Evaluate decision vectors on the rayon thread pool
    ///
    /// Evaluation runs concurrently; validation happens afterwards in member
    /// order, so the reported failure is the same as in the sequential path.
    pub fn evaluate_parallel<O>(
        decisions: Vec<Vec<f64>>,
        objective: &O,
        expected_objectives: Option<usize>,
    ) -> MogwoResult<Self>
    where
        O: ObjectiveFunction + ?Sized,
    {
        let results: Vec<_> = decisions
            .par_iter()
            .map(|d| objective.evaluate(d))
            .collect();
        Self::assemble(decisions, results, expected_objectives)
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl Population {
    /// Evaluate decision vectors (sequential fallback)
    pub fn evaluate_parallel<O>(
        decisions: Vec<Vec<f64>>,
        objective: &O,
        expected_objectives: Option<usize>,
    ) -> MogwoResult<Self>
    where
        O: ObjectiveFunction + ?Sized,
    {
        Self::evaluate(decisions, objective, expected_objectives)
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Solution;

    fn index(&self, index: usize) -> &Self::Output {
        &self.solutions[index]
    }
}

/// Validate one objective vector against the objective contract
fn check_objectives(index: usize, objectives: &[f64], expected: Option<usize>) -> MogwoResult<()> {
    match expected {
        Some(m) if objectives.len() != m => {
            return Err(MogwoError::DimensionMismatch {
                expected: m,
                actual: objectives.len(),
            })
        }
        None if objectives.len() < 2 => {
            return Err(MogwoError::DimensionMismatch {
                expected: 2,
                actual: objectives.len(),
            })
        }
        _ => {}
    }
    if objectives.iter().any(|v| !v.is_finite()) {
        return Err(MogwoError::NonFiniteObjective { index });
    }
    Ok(())
}
