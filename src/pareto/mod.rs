//! Pareto dominance primitives
//!
//! Dominance tests, non-dominated sorting, crowding distance and sigma-sharing.
//! Everything here is stateless and operates on plain objective vectors.

pub mod diversity;
pub mod dominance;

pub use diversity::{crowding_distance, euclidean, select_by_sharing, sharing_values};
pub use dominance::{
    dominates, non_dominated_filter, non_dominated_sort, select_n, weakly_dominates,
};

pub mod prelude {
    pub use super::diversity::*;
    pub use super::dominance::*;
}
