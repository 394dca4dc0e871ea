//! Quality indicators

pub mod hypervolume;

pub mod prelude {
    pub use super::hypervolume::*;
}
