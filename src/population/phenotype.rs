//! Phenotype type
//!
//! This module provides the Phenotype type that wraps a chromosome with its
//! fitness and age.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fitness::traits::Evaluator;
use crate::genome::chromosome::Chromosome;

/// Compare two fitness values, treating NaN as less than all other values
///
/// NaN-scored phenotypes therefore sort behind every scored one.
pub fn compare_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// A chromosome annotated with its fitness and age
///
/// The fitness is assigned once, at construction, and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    chromosome: Chromosome,
    fitness: f64,
    age: usize,
}

impl Phenotype {
    /// Create a fresh (age 0) phenotype with a known fitness
    pub fn new(chromosome: Chromosome, fitness: f64) -> Self {
        Self {
            chromosome,
            fitness,
            age: 0,
        }
    }

    /// Score a chromosome and wrap it in a fresh phenotype
    pub fn evaluate<E: Evaluator + ?Sized>(chromosome: Chromosome, evaluator: &E) -> Self {
        let fitness = evaluator.evaluate(&chromosome);
        Self::new(chromosome, fitness)
    }

    /// The encoded candidate
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Fitness score (higher is better)
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Number of generations this phenotype has survived as an elite
    pub fn age(&self) -> usize {
        self.age
    }

    /// Take the chromosome out of this phenotype
    pub fn into_chromosome(self) -> Chromosome {
        self.chromosome
    }

    /// Check if this phenotype is fitter than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        compare_fitness(self.fitness, other.fitness) == Ordering::Greater
    }

    /// Age by one generation and return the new age
    pub(crate) fn grow_older(&mut self) -> usize {
        self.age = self.age.saturating_add(1);
        self.age
    }
}
