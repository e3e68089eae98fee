//! Diagnostics and statistics
//!
//! This module provides per-generation statistics and the summary returned
//! by a finished run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::control::EngineState;
use crate::population::phenotype::Phenotype;
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0-based)
    pub generation: usize,
    /// Best fitness in this generation
    pub best_fitness: f64,
    /// Worst fitness in this generation
    pub worst_fitness: f64,
    /// Mean fitness
    pub mean_fitness: f64,
    /// Fitness standard deviation
    pub fitness_std: f64,
    /// Elite phenotypes carried over from the previous generation
    pub survivors: usize,
    /// Elite candidates dropped for exceeding the maximum age
    pub retired: usize,
    /// Wall-clock time spent producing the generation
    pub elapsed: Duration,
}

impl GenerationStats {
    /// Compute statistics from a population
    pub fn from_population(population: &Population, generation: usize) -> Self {
        Self {
            generation,
            best_fitness: population
                .best()
                .map_or(f64::NEG_INFINITY, Phenotype::fitness),
            worst_fitness: population
                .worst()
                .map_or(f64::INFINITY, Phenotype::fitness),
            mean_fitness: population.mean_fitness().unwrap_or(0.0),
            fitness_std: population.fitness_std().unwrap_or(0.0),
            survivors: 0,
            retired: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Set elite carry-over counts
    pub fn with_elites(mut self, survivors: usize, retired: usize) -> Self {
        self.survivors = survivors;
        self.retired = retired;
        self
    }

    /// Set the generation duration
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

/// Statistics collector for an entire run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Statistics of the most recent generation
    pub fn last(&self) -> Option<&GenerationStats> {
        self.generations.last()
    }

    /// Best fitness across all generations
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// History of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// History of mean fitness values
    pub fn mean_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Total elite candidates retired by age
    pub fn total_retired(&self) -> usize {
        self.generations.iter().map(|g| g.retired).sum()
    }
}

/// Result of a finished run
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Fittest phenotype of the final population
    pub best: Phenotype,
    /// Time from seeding to the end of the last generation
    pub elapsed: Duration,
    /// Number of generations completed
    pub generations: usize,
    /// State the engine finished in
    pub state: EngineState,
    /// Statistics for the run
    pub stats: EvolutionStats,
}

impl RunSummary {
    /// Short human-readable report
    pub fn summary(&self) -> String {
        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Runtime: {:.2}ms\n\
             - Final state: {}",
            self.generations,
            self.best.fitness(),
            self.elapsed.as_secs_f64() * 1000.0,
            self.state
        )
    }
}

pub mod prelude {
    pub use super::{EvolutionStats, GenerationStats, RunSummary};
}
