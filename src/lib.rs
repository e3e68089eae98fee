//! # gene-pool
//!
//! A generational genetic algorithm engine over real-valued chromosomes.
//!
//! Candidate solutions are chromosomes made of equal-length genes whose
//! alleles lie in [0, 1]. A caller-supplied evaluator scores each one, and
//! the engine evolves the population through elitism with aging, parent
//! selection, crossover and mutation. Offspring are produced concurrently
//! when the `parallel` feature is enabled.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gene_pool::prelude::*;
//!
//! let configuration = Configuration::builder()
//!     .chromosome_length(10)
//!     .population_size(50)
//!     .elitism(0.2)
//!     .iterations(100)
//!     .selection(TournamentSelection::binary())
//!     .crossover(UniformCrossover)
//!     .mutation(UniformMutation::new(0.1)?)
//!     .evaluator(CountAbove::midpoint())
//!     .build()?;
//!
//! let summary = Engine::new(configuration).start()?;
//! println!("best fitness {}", summary.best.fitness());
//! # Ok::<(), EvolutionError>(())
//! ```

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::diagnostics::prelude::*;
    pub use crate::engine::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
