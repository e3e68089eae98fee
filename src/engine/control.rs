//! Run state and cooperative cancellation
//!
//! The engine keeps its lifecycle state behind a single mutex shared with
//! every [`StopHandle`]. All transitions go through that lock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Lifecycle state of an engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Constructed, never started
    #[default]
    Idle,
    /// Producing generations
    Running,
    /// Halted by a stop request or a fatal error
    Stopped,
    /// Iteration budget used up
    Exhausted,
}

impl EngineState {
    /// Whether the run has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Exhausted)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Shared, synchronized run state
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedState(Arc<Mutex<EngineState>>);

impl SharedState {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // The guarded value is a plain enum; a panicking holder cannot leave it torn
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state
    pub(crate) fn get(&self) -> EngineState {
        *self.lock()
    }

    /// Unconditionally set the state
    pub(crate) fn set(&self, state: EngineState) {
        *self.lock() = state;
    }

    /// Move from `from` to `to`; returns false and leaves the state alone otherwise
    pub(crate) fn transition(&self, from: EngineState, to: EngineState) -> bool {
        let mut state = self.lock();
        if *state == from {
            *state = to;
            true
        } else {
            false
        }
    }
}

/// Cloneable handle for stopping a running engine from another thread
///
/// A stop is observed at the start of the next generation.
#[derive(Clone, Debug)]
pub struct StopHandle {
    state: SharedState,
}

impl StopHandle {
    pub(crate) fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Request a stop
    ///
    /// Returns true if this call moved the engine from running to stopped.
    /// Calling it on an engine that is not running does nothing.
    pub fn stop(&self) -> bool {
        self.state
            .transition(EngineState::Running, EngineState::Stopped)
    }

    /// Current state of the engine this handle belongs to
    pub fn state(&self) -> EngineState {
        self.state.get()
    }
}
