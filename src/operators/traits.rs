//! Operator traits
//!
//! This module defines the core operator traits for the engine. Every
//! operator is object safe so configurations can hold them as trait objects,
//! and takes its randomness as `&mut dyn RngCore` so each worker thread can
//! supply its own generator.

use std::fmt::Debug;

use rand::RngCore;

use crate::error::OperatorError;
use crate::genome::chromosome::Chromosome;
use crate::genome::gene::Gene;
use crate::population::phenotype::Phenotype;

/// Selection operator trait
///
/// Chooses chromosomes from a scored population to act as crossover parents.
pub trait Selection: Send + Sync + Debug {
    /// Select `n` parents from the population
    ///
    /// Fails with `SelectionSizeExceeded` when `n` exceeds the population size.
    fn select<'a>(
        &self,
        population: &'a [Phenotype],
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<&'a Chromosome>, OperatorError>;
}

/// Crossover operator trait
///
/// Combines parent chromosomes into children. The arity returned by
/// `children` is both the number of parents consumed and the number of
/// children produced per call.
pub trait Crossover: Send + Sync + Debug {
    /// Apply crossover to the parents and produce children
    fn cross(
        &self,
        parents: &[&Chromosome],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Chromosome>, OperatorError>;

    /// Number of parents required and children produced per call
    fn children(&self) -> usize;
}

/// Mutation operator trait
///
/// Perturbs a gene in place, keeping every allele in [0, 1].
pub trait Mutation: Send + Sync + Debug {
    /// Apply mutation to a gene in place
    fn mutate(&self, gene: &mut Gene, rng: &mut dyn RngCore);
}

/// Check that `n` parents can be drawn from a population of `available`
pub(crate) fn ensure_selectable(n: usize, available: usize) -> Result<(), OperatorError> {
    if n > available {
        return Err(OperatorError::SelectionSizeExceeded {
            requested: n,
            available,
        });
    }
    Ok(())
}

/// Check that exactly two compatible parents were supplied
pub(crate) fn ensure_two_parents<'a>(
    parents: &[&'a Chromosome],
) -> Result<(&'a Chromosome, &'a Chromosome), OperatorError> {
    match parents {
        [mother, father] => {
            mother.ensure_same_shape(father)?;
            Ok((*mother, *father))
        }
        _ => Err(OperatorError::InvalidArity {
            expected: 2,
            actual: parents.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    // Mock selection operator for testing
    #[derive(Debug)]
    struct FirstN;

    impl Selection for FirstN {
        fn select<'a>(
            &self,
            population: &'a [Phenotype],
            n: usize,
            _rng: &mut dyn RngCore,
        ) -> Result<Vec<&'a Chromosome>, OperatorError> {
            ensure_selectable(n, population.len())?;
            Ok(population[..n].iter().map(Phenotype::chromosome).collect())
        }
    }

    // Mock crossover operator for testing
    #[derive(Debug)]
    struct Swap;

    impl Crossover for Swap {
        fn cross(
            &self,
            parents: &[&Chromosome],
            _rng: &mut dyn RngCore,
        ) -> Result<Vec<Chromosome>, OperatorError> {
            let (mother, father) = ensure_two_parents(parents)?;
            Ok(vec![father.clone(), mother.clone()])
        }

        fn children(&self) -> usize {
            2
        }
    }

    // Mock mutation operator for testing
    #[derive(Debug)]
    struct Jitter;

    impl Mutation for Jitter {
        fn mutate(&self, gene: &mut Gene, rng: &mut dyn RngCore) {
            for allele in gene.values_mut() {
                *allele = (*allele + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0);
            }
        }
    }

    fn population(size: usize) -> Vec<Phenotype> {
        (0..size)
            .map(|i| Phenotype::new(Chromosome::new(2, 1).unwrap(), i as f64))
            .collect()
    }

    #[test]
    fn test_mock_selection() {
        let mut rng = rand::thread_rng();
        let population = population(5);
        let parents = FirstN.select(&population, 3, &mut rng).unwrap();
        assert_eq!(parents.len(), 3);
    }

    #[test]
    fn test_ensure_selectable() {
        assert!(ensure_selectable(3, 3).is_ok());
        assert_eq!(
            ensure_selectable(4, 3),
            Err(OperatorError::SelectionSizeExceeded {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_mock_crossover_through_trait_object() {
        let mut rng = rand::thread_rng();
        let crossover: Box<dyn Crossover> = Box::new(Swap);
        let a = Chromosome::new(3, 1).unwrap();
        let b = Chromosome::random(3, 1, &mut rng).unwrap();

        let children = crossover.cross(&[&a, &b], &mut rng).unwrap();
        assert_eq!(children, vec![b.clone(), a.clone()]);
        assert_eq!(crossover.children(), 2);
    }

    #[test]
    fn test_ensure_two_parents_arity() {
        let a = Chromosome::new(3, 1).unwrap();
        assert_eq!(
            ensure_two_parents(&[&a]).unwrap_err(),
            OperatorError::InvalidArity {
                expected: 2,
                actual: 1
            }
        );
        assert!(ensure_two_parents(&[&a, &a, &a]).is_err());
    }

    #[test]
    fn test_ensure_two_parents_shape() {
        let a = Chromosome::new(3, 1).unwrap();
        let b = Chromosome::new(4, 1).unwrap();
        assert!(matches!(
            ensure_two_parents(&[&a, &b]),
            Err(OperatorError::IncompatibleParents(_))
        ));
    }

    #[test]
    fn test_mock_mutation() {
        let mut rng = rand::thread_rng();
        let mut gene = Gene::new(10).unwrap();
        Jitter.mutate(&mut gene, &mut rng);
        assert!(gene.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
