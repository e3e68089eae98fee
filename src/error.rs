//! Error types for gene-pool
//!
//! This module defines all error types used throughout the library.
//! Every error here stems from a configuration or programming mistake, so
//! callers are expected to propagate them rather than retry.

use thiserror::Error;

/// Error type for gene and chromosome construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// A gene or chromosome was requested with a zero length
    #[error("Invalid {what} length: {length} (length must be greater than zero)")]
    InvalidLength {
        /// What was being built ("gene" or "chromosome")
        what: &'static str,
        /// The rejected length
        length: usize,
    },

    /// An allele outside of [0, 1]
    #[error("Allele out of range at index {index}: {value} (expected a value in [0, 1])")]
    OutOfRange { index: usize, value: f64 },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// A crossover received the wrong number of parents
    #[error("Invalid parents number: {actual} != {expected}")]
    InvalidArity { expected: usize, actual: usize },

    /// A selection asked for more parents than the population holds
    #[error("Invalid selection size: {requested} > {available} (population size)")]
    SelectionSizeExceeded { requested: usize, available: usize },

    /// Parents disagree on chromosome or gene length
    #[error("Incompatible parents: {0}")]
    IncompatibleParents(#[from] GenomeError),

    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error (a strategy contract violation)
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Engine settings could not be parsed or rendered
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

impl From<serde_json::Error> for EvolutionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
