//! Fitness traits
//!
//! This module defines the evaluator abstraction supplied by callers.

use crate::genome::chromosome::Chromosome;

/// Fitness evaluation trait
///
/// Scores a chromosome; higher is better. The engine calls it exactly once
/// per newly created phenotype, possibly from several worker threads at
/// once, so implementations must be side-effect free from the engine's
/// point of view.
pub trait Evaluator: Send + Sync {
    /// Evaluate fitness (higher = better)
    fn evaluate(&self, chromosome: &Chromosome) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&Chromosome) -> f64 + Send + Sync,
{
    fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        self(chromosome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GeneCount;

    impl Evaluator for GeneCount {
        fn evaluate(&self, chromosome: &Chromosome) -> f64 {
            chromosome.len() as f64
        }
    }

    #[test]
    fn test_struct_evaluator() {
        let chromosome = Chromosome::new(7, 1).unwrap();
        assert_eq!(GeneCount.evaluate(&chromosome), 7.0);
    }

    #[test]
    fn test_closure_evaluator() {
        let evaluator = |c: &Chromosome| -(c.gene_length() as f64);
        let chromosome = Chromosome::new(2, 3).unwrap();
        assert_eq!(evaluator.evaluate(&chromosome), -3.0);
    }

    #[test]
    fn test_evaluator_as_trait_object() {
        let evaluators: Vec<Box<dyn Evaluator>> =
            vec![Box::new(GeneCount), Box::new(|_: &Chromosome| 1.5)];
        let chromosome = Chromosome::new(4, 1).unwrap();
        let scores: Vec<f64> = evaluators.iter().map(|e| e.evaluate(&chromosome)).collect();
        assert_eq!(scores, vec![4.0, 1.5]);
    }
}
