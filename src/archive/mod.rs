//! External Pareto archive
//!
//! This module provides the bounded archive and its pruning strategies.

pub mod bounded;
pub mod pruning;

pub mod prelude {
    pub use super::bounded::*;
    pub use super::pruning::*;
}
