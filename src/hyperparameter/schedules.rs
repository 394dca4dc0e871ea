//! Parameter schedules for deterministic control
//!
//! Schedules provide predetermined parameter values based on generation number.
//! Every schedule is a function of the progress ratio `t = g / G`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{MogwoError, MogwoResult};

/// Parameter schedule trait
///
/// Defines how a parameter changes over the course of the search.
pub trait ParameterSchedule: Send + Sync {
    /// Get the parameter value at a given generation
    fn value_at(&self, generation: usize, max_generations: usize) -> f64;
}

/// Progress ratio in `[0, 1]`
fn progress(generation: usize, max_generations: usize) -> f64 {
    if max_generations == 0 {
        return 1.0;
    }
    (generation as f64 / max_generations as f64).min(1.0)
}

/// Decay of the exploration coefficient `a` from 2 to 0
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DecaySchedule {
    /// a(g) = 2(1 - g/G)
    #[default]
    Linear,
    /// a(g) = 2(1 - (g/G)^p), slower early decay for larger p
    Polynomial {
        /// Exponent p >= 1
        power: f64,
    },
}

impl DecaySchedule {
    /// Check the exponent
    pub fn validate(&self) -> MogwoResult<()> {
        match *self {
            Self::Linear => Ok(()),
            Self::Polynomial { power } if power >= 1.0 && power.is_finite() => Ok(()),
            Self::Polynomial { power } => Err(MogwoError::Configuration(format!(
                "decay exponent must be >= 1, got {}",
                power
            ))),
        }
    }
}

impl ParameterSchedule for DecaySchedule {
    fn value_at(&self, generation: usize, max_generations: usize) -> f64 {
        let t = progress(generation, max_generations);
        match *self {
            Self::Linear => 2.0 * (1.0 - t),
            Self::Polynomial { power } => 2.0 * (1.0 - t.powf(power)),
        }
    }
}

/// Fraction of the previous position blended into the new one
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DiversitySchedule {
    /// No retention
    #[default]
    Off,
    /// initial · (1 - t)
    Linear {
        /// Fraction at the first generation
        initial: f64,
    },
    /// initial · e^(-rate · t)
    Exponential {
        /// Fraction at the first generation
        initial: f64,
        /// Decay rate
        rate: f64,
    },
}

impl DiversitySchedule {
    /// Linear retention starting at 0.1
    pub fn linear() -> Self {
        Self::Linear { initial: 0.1 }
    }

    /// Exponential retention 0.15·e^(-2t)
    pub fn exponential() -> Self {
        Self::Exponential {
            initial: 0.15,
            rate: 2.0,
        }
    }

    /// Check that the retention fraction stays in `[0, 1]`
    pub fn validate(&self) -> MogwoResult<()> {
        let initial = match *self {
            Self::Off => return Ok(()),
            Self::Linear { initial } => initial,
            Self::Exponential { initial, rate } => {
                if !(rate >= 0.0 && rate.is_finite()) {
                    return Err(MogwoError::Configuration(format!(
                        "diversity decay rate must be non-negative, got {}",
                        rate
                    )));
                }
                initial
            }
        };
        if (0.0..=1.0).contains(&initial) {
            Ok(())
        } else {
            Err(MogwoError::Configuration(format!(
                "diversity fraction must be in [0, 1], got {}",
                initial
            )))
        }
    }
}

impl ParameterSchedule for DiversitySchedule {
    fn value_at(&self, generation: usize, max_generations: usize) -> f64 {
        let t = progress(generation, max_generations);
        match *self {
            Self::Off => 0.0,
            Self::Linear { initial } => initial * (1.0 - t),
            Self::Exponential { initial, rate } => initial * (-rate * t).exp(),
        }
    }
}

/// Differential scale factor growing weaker over the run: F·(1.5 - t)
#[derive(Clone, Debug)]
pub struct AdaptiveScaleFactor {
    /// Base F
    pub base: f64,
}

impl AdaptiveScaleFactor {
    /// Create a new adaptive scale factor
    pub fn new(base: f64) -> Self {
        Self { base }
    }
}

impl ParameterSchedule for AdaptiveScaleFactor {
    fn value_at(&self, generation: usize, max_generations: usize) -> f64 {
        self.base * (1.5 - progress(generation, max_generations))
    }
}

/// Crossover rate peaking mid-run: CR·(1 + 0.5 sin(πt)), clamped to `[0, 1]`
#[derive(Clone, Debug)]
pub struct AdaptiveCrossoverRate {
    /// Base CR
    pub base: f64,
}

impl AdaptiveCrossoverRate {
    /// Create a new adaptive crossover rate
    pub fn new(base: f64) -> Self {
        Self { base }
    }
}

impl ParameterSchedule for AdaptiveCrossoverRate {
    fn value_at(&self, generation: usize, max_generations: usize) -> f64 {
        let t = progress(generation, max_generations);
        (self.base * (1.0 + 0.5 * (PI * t).sin())).clamp(0.0, 1.0)
    }
}
