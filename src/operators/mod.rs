//! Search operators
//!
//! This module provides the swarm position update and its building blocks:
//! the leader pull, differential hybridization, Lévy steps and bound repair.

pub mod boundary;
pub mod levy;
pub mod position;

pub mod prelude {
    pub use super::boundary::*;
    pub use super::levy::*;
    pub use super::position::*;
}
