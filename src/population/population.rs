//! Population type
//!
//! This module provides the Population container type.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fitness::traits::Evaluator;
use crate::genome::chromosome::Chromosome;
use crate::population::phenotype::{compare_fitness, Phenotype};

/// An ordered collection of phenotypes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    phenotypes: Vec<Phenotype>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a population from a vector of phenotypes
    pub fn from_phenotypes(phenotypes: Vec<Phenotype>) -> Self {
        Self { phenotypes }
    }

    /// Score every chromosome and collect the resulting phenotypes
    pub fn evaluate<E: Evaluator + ?Sized>(chromosomes: Vec<Chromosome>, evaluator: &E) -> Self {
        chromosomes
            .into_iter()
            .map(|c| Phenotype::evaluate(c, evaluator))
            .collect()
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.phenotypes.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.phenotypes.is_empty()
    }

    /// Get a phenotype by index
    pub fn get(&self, index: usize) -> Option<&Phenotype> {
        self.phenotypes.get(index)
    }

    /// Get an iterator over the phenotypes
    pub fn iter(&self) -> impl Iterator<Item = &Phenotype> {
        self.phenotypes.iter()
    }

    /// Get the underlying phenotypes
    pub fn phenotypes(&self) -> &[Phenotype] {
        &self.phenotypes
    }

    /// Take the phenotypes out of this population
    pub fn into_phenotypes(self) -> Vec<Phenotype> {
        self.phenotypes
    }

    /// Get the fittest phenotype
    ///
    /// Ties keep the earliest phenotype in population order.
    pub fn best(&self) -> Option<&Phenotype> {
        self.phenotypes
            .iter()
            .reduce(|best, p| if p.is_better_than(best) { p } else { best })
    }

    /// Get the least fit phenotype
    ///
    /// Ties keep the earliest phenotype in population order.
    pub fn worst(&self) -> Option<&Phenotype> {
        self.phenotypes
            .iter()
            .reduce(|worst, p| if worst.is_better_than(p) { p } else { worst })
    }

    /// Sort the population by fitness, best first
    ///
    /// The sort is stable: equally fit phenotypes keep their relative order.
    pub fn sort_by_fitness(&mut self) {
        self.phenotypes
            .sort_by(|a, b| compare_fitness(b.fitness(), a.fitness()));
    }

    /// Compute mean fitness
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.phenotypes.is_empty() {
            return None;
        }
        let sum: f64 = self.phenotypes.iter().map(Phenotype::fitness).sum();
        Some(sum / self.phenotypes.len() as f64)
    }

    /// Compute fitness standard deviation
    pub fn fitness_std(&self) -> Option<f64> {
        let mean = self.mean_fitness()?;
        if self.phenotypes.len() < 2 {
            return None;
        }

        let variance = self
            .phenotypes
            .iter()
            .map(|p| (p.fitness() - mean).powi(2))
            .sum::<f64>()
            / (self.phenotypes.len() - 1) as f64;
        Some(variance.sqrt())
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl Population {
    /// Score every chromosome in parallel
    pub fn evaluate_parallel<E: Evaluator + ?Sized>(
        chromosomes: Vec<Chromosome>,
        evaluator: &E,
    ) -> Self {
        let phenotypes = chromosomes
            .into_par_iter()
            .map(|c| Phenotype::evaluate(c, evaluator))
            .collect();
        Self { phenotypes }
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl Population {
    /// Score every chromosome (sequential fallback)
    pub fn evaluate_parallel<E: Evaluator + ?Sized>(
        chromosomes: Vec<Chromosome>,
        evaluator: &E,
    ) -> Self {
        Self::evaluate(chromosomes, evaluator)
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Phenotype;

    fn index(&self, index: usize) -> &Self::Output {
        &self.phenotypes[index]
    }
}

impl IntoIterator for Population {
    type Item = Phenotype;
    type IntoIter = std::vec::IntoIter<Phenotype>;

    fn into_iter(self) -> Self::IntoIter {
        self.phenotypes.into_iter()
    }
}

impl FromIterator<Phenotype> for Population {
    fn from_iter<I: IntoIterator<Item = Phenotype>>(iter: I) -> Self {
        Self::from_phenotypes(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_population() -> Population {
        [30.0, 10.0, 50.0, 20.0, 40.0]
            .into_iter()
            .map(|f| Phenotype::new(Chromosome::new(1, 1).unwrap(), f))
            .collect()
    }

    #[test]
    fn test_population_best_and_worst() {
        let population = create_test_population();
        assert_eq!(population.best().unwrap().fitness(), 50.0);
        assert_eq!(population.worst().unwrap().fitness(), 10.0);
    }

    #[test]
    fn test_population_best_empty() {
        let population = Population::new();
        assert!(population.best().is_none());
        assert!(population.worst().is_none());
    }

    #[test]
    fn test_population_best_keeps_first_tie() {
        let first = Chromosome::from_genes(vec![
            crate::genome::gene::Gene::from_values(vec![0.1]).unwrap(),
        ])
        .unwrap();
        let second = Chromosome::new(1, 1).unwrap();
        let population = Population::from_phenotypes(vec![
            Phenotype::new(first.clone(), 7.0),
            Phenotype::new(second, 7.0),
        ]);

        assert_eq!(population.best().unwrap().chromosome(), &first);
        assert_eq!(population.worst().unwrap().chromosome(), &first);
    }

    #[test]
    fn test_population_sort_by_fitness() {
        let mut population = create_test_population();
        population.sort_by_fitness();

        let fitnesses: Vec<f64> = population.iter().map(Phenotype::fitness).collect();
        assert_eq!(fitnesses, vec![50.0, 40.0, 30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_population_sort_is_stable() {
        let tagged: Vec<Phenotype> = (0..6)
            .map(|i| {
                let gene = crate::genome::gene::Gene::from_values(vec![i as f64 / 10.0]).unwrap();
                let chromosome = Chromosome::from_genes(vec![gene]).unwrap();
                Phenotype::new(chromosome, (i % 2) as f64)
            })
            .collect();
        let mut population = Population::from_phenotypes(tagged);
        population.sort_by_fitness();

        let tags: Vec<f64> = population
            .iter()
            .map(|p| p.chromosome()[0][0])
            .collect();
        assert_eq!(tags, vec![0.1, 0.3, 0.5, 0.0, 0.2, 0.4]);
    }

    #[test]
    fn test_population_sort_nan_last() {
        let mut population: Population = [f64::NAN, 1.0, 2.0]
            .into_iter()
            .map(|f| Phenotype::new(Chromosome::new(1, 1).unwrap(), f))
            .collect();
        population.sort_by_fitness();
        assert_eq!(population[0].fitness(), 2.0);
        assert!(population[2].fitness().is_nan());
    }

    #[test]
    fn test_population_into_phenotypes() {
        let phenotypes = create_test_population().into_phenotypes();
        let fitnesses: Vec<f64> = phenotypes.iter().map(Phenotype::fitness).collect();
        assert_eq!(fitnesses, vec![30.0, 10.0, 50.0, 20.0, 40.0]);
    }

    #[test]
    fn test_population_statistics() {
        let population = create_test_population();
        assert_eq!(population.mean_fitness(), Some(30.0));
        let std = population.fitness_std().unwrap();
        assert!((std - 250.0f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_population_evaluate_parallel() {
        let mut rng = rand::thread_rng();
        let chromosomes: Vec<Chromosome> = (0..20)
            .map(|_| Chromosome::random(4, 2, &mut rng).unwrap())
            .collect();
        let evaluator = |c: &Chromosome| c.genes().iter().map(|g| g[0]).sum::<f64>();

        let population = Population::evaluate_parallel(chromosomes.clone(), &evaluator);
        assert_eq!(population.len(), 20);
        for (p, c) in population.iter().zip(&chromosomes) {
            assert_eq!(p.chromosome(), c);
            assert_eq!(p.fitness(), evaluator(c));
            assert_eq!(p.age(), 0);
        }
    }
}
