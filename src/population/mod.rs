//! Population management
//!
//! This module provides the Phenotype and Population types.

pub mod phenotype;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::phenotype::*;
    pub use super::population::*;
}
