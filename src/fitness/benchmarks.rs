//! Benchmark fitness functions
//!
//! Reference evaluators for exercising the engine on problems with a known
//! optimum.

use crate::fitness::traits::Evaluator;
use crate::genome::chromosome::Chromosome;

/// Counts alleles strictly above a threshold
///
/// With a threshold of 0.5 and genes of length 1 this is the real-valued
/// analogue of OneMax: the optimum equals the chromosome length.
#[derive(Clone, Debug)]
pub struct CountAbove {
    threshold: f64,
}

impl CountAbove {
    /// Create a new counter with the given threshold
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Counter with the 0.5 midpoint threshold
    pub fn midpoint() -> Self {
        Self::new(0.5)
    }

    /// The threshold alleles must exceed
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for CountAbove {
    fn default() -> Self {
        Self::midpoint()
    }
}

impl Evaluator for CountAbove {
    fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        chromosome
            .genes()
            .iter()
            .flat_map(|g| g.values())
            .filter(|&&v| v > self.threshold)
            .count() as f64
    }
}

/// Negated squared distance to a target allele vector
///
/// Alleles are compared in gene order, flattened. The optimum is 0, reached
/// when every allele equals its target.
#[derive(Clone, Debug)]
pub struct TargetMatch {
    target: Vec<f64>,
}

impl TargetMatch {
    /// Create a new target matcher
    pub fn new(target: Vec<f64>) -> Self {
        Self { target }
    }

    /// Number of target alleles
    pub fn dimension(&self) -> usize {
        self.target.len()
    }
}

impl Evaluator for TargetMatch {
    fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        -chromosome
            .genes()
            .iter()
            .flat_map(|g| g.values())
            .zip(&self.target)
            .map(|(v, t)| (v - t).powi(2))
            .sum::<f64>()
    }
}
