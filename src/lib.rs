//! # mogwo
//!
//! A multi-objective grey wolf optimizer for continuous box-constrained
//! problems.
//!
//! A population of candidate solutions is pulled towards three leaders drawn
//! from an external archive of non-dominated solutions. The archive is kept
//! within a fixed capacity by crowding distance, sigma-sharing or clustering,
//! and its hypervolume is tracked as the convergence signal.
//!
//! ## Core Concepts
//!
//! - **Pareto archive**: Bounded store of mutually non-dominated solutions
//! - **Leader selection**: Random, crowding-ranked or hypervolume-driven composite choice of alpha, beta and delta
//! - **Position update**: The grey wolf encircling rule, optionally hybridized with differential mutation, position retention and Lévy steps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mogwo::prelude::*;
//!
//! let result = Mogwo::builder()
//!     .bounds(MultiBounds::uniform(Bounds::unit(), 30))
//!     .population_size(100)
//!     .max_generations(250)
//!     .archive_size(100)
//!     .leaders(LeaderStrategy::Composite)
//!     .seed(42)
//!     .objective(|x: &[f64]| {
//!         let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / 29.0;
//!         vec![x[0], g * (1.0 - (x[0] / g).sqrt())]
//!     })
//!     .build()?
//!     .run()?;
//! ```

pub mod algorithms;
pub mod archive;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod hyperparameter;
pub mod indicators;
pub mod leaders;
pub mod operators;
pub mod pareto;
pub mod population;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::archive::prelude::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::hyperparameter::prelude::*;
    pub use crate::indicators::prelude::*;
    pub use crate::leaders::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::pareto::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
}
