//! Objective evaluation
//!
//! This module provides the objective function abstraction consumed by the
//! optimizer.

pub mod traits;

pub mod prelude {
    pub use super::traits::*;
}
