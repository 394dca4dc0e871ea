//! Decision space
//!
//! This module provides the box bounds of the search space.

pub mod bounds;

pub mod prelude {
    pub use super::bounds::*;
}
