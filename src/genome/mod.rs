//! Genetic material
//!
//! This module provides the `Gene` and `Chromosome` types.

pub mod chromosome;
pub mod gene;

pub mod prelude {
    pub use super::chromosome::*;
    pub use super::gene::*;
}
