//! Hyperparameter control
//!
//! Deterministic schedules for the exploration coefficient, the differential
//! mutation parameters and the diversity retention fraction.

pub mod schedules;

pub mod prelude {
    pub use super::schedules::*;
}
