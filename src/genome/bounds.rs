//! Bounds for decision vectors
//!
//! This module provides the box constraints `[lb, ub]` that every decision
//! vector must satisfy, along with the repair and sampling helpers the search
//! loop needs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MogwoError, MogwoResult};

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max. Use [`Bounds::try_new`] for a fallible variant.
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create new bounds, rejecting `min > max` and non-finite limits
    pub fn try_new(min: f64, max: f64) -> MogwoResult<Self> {
        let bounds = Self { min, max };
        bounds.validate(0)?;
        Ok(bounds)
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Mirror a violating value back inside the box, then clamp.
    ///
    /// A value overshooting a limit by `d` lands `d` inside that limit; if the
    /// overshoot exceeds the whole range the result is clamped.
    pub fn reflect(&self, value: f64) -> f64 {
        let reflected = if value < self.min {
            self.min + (self.min - value)
        } else if value > self.max {
            self.max - (value - self.max)
        } else {
            value
        };
        self.clamp(reflected)
    }

    /// Opposite point `min + max - value`
    pub fn opposite(&self, value: f64) -> f64 {
        self.min + self.max - value
    }

    /// Draw a uniform value inside the bounds
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.range() == 0.0 {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    /// Denormalize a value from [0, 1] to bounds
    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * self.range()
    }

    fn validate(&self, dimension: usize) -> MogwoResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(MogwoError::InvalidBounds {
                dimension,
                lower: self.min,
                upper: self.max,
            });
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

/// Multi-dimensional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Build from `(lower, upper)` pairs, failing on the first inverted pair
    pub fn from_pairs(pairs: &[(f64, f64)]) -> MogwoResult<Self> {
        let bounds = Self {
            bounds: pairs
                .iter()
                .map(|&(min, max)| Bounds { min, max })
                .collect(),
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Build from separate lower and upper vectors
    pub fn from_limits(lower: &[f64], upper: &[f64]) -> MogwoResult<Self> {
        if lower.len() != upper.len() {
            return Err(MogwoError::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        let pairs: Vec<(f64, f64)> = lower.iter().copied().zip(upper.iter().copied()).collect();
        Self::from_pairs(&pairs)
    }

    /// Check every dimension for `lower <= upper`
    pub fn validate(&self) -> MogwoResult<()> {
        if self.bounds.is_empty() {
            return Err(MogwoError::Configuration(
                "Bounds must cover at least one dimension".to_string(),
            ));
        }
        for (dimension, b) in self.bounds.iter().enumerate() {
            b.validate(dimension)?;
        }
        Ok(())
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Clamp a vector to be within bounds
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(&self.bounds) {
            *value = b.clamp(*value);
        }
    }

    /// Reflect a vector back inside the bounds
    pub fn reflect_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(&self.bounds) {
            *value = b.reflect(*value);
        }
    }

    /// Opposition-based counterpart of a decision vector
    pub fn opposite_vec(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(&self.bounds)
            .map(|(&v, b)| b.opposite(v))
            .collect()
    }

    /// Draw a uniform decision vector
    pub fn sample_vec<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(&self.bounds)
                .all(|(&v, b)| b.contains(v))
    }
}

impl FromIterator<Bounds> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}
