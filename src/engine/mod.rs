//! Evolution engine
//!
//! This module provides the run configuration, the lifecycle state with its
//! stop handle, and the generational engine itself.

pub mod config;
pub mod control;
#[allow(clippy::module_inception)]
pub mod engine;

pub mod prelude {
    pub use super::config::*;
    pub use super::control::{EngineState, StopHandle};
    pub use super::engine::*;
}
