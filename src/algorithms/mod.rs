//! Search algorithms
//!
//! This module provides the multi-objective grey wolf optimizer.

pub mod mogwo;

pub mod prelude {
    pub use super::mogwo::*;
}
