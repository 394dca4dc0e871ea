//! Population management
//!
//! This module provides the Solution and Population types.

#[allow(clippy::module_inception)]
pub mod population;
pub mod solution;

pub mod prelude {
    pub use super::population::*;
    pub use super::solution::*;
}
