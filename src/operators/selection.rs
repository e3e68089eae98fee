//! Selection operators
//!
//! This module provides the parent selection operators. All of them return
//! borrowed chromosomes; crossover clones whatever it keeps.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::OperatorError;
use crate::genome::chromosome::Chromosome;
use crate::operators::traits::{ensure_selectable, Selection};
use crate::population::phenotype::{compare_fitness, Phenotype};

/// Random selection (uniform, with replacement)
///
/// Ignores fitness entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSelection;

impl RandomSelection {
    /// Create a new random selection
    pub fn new() -> Self {
        Self
    }
}

impl Selection for RandomSelection {
    fn select<'a>(
        &self,
        population: &'a [Phenotype],
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<&'a Chromosome>, OperatorError> {
        ensure_selectable(n, population.len())?;
        Ok((0..n)
            .map(|_| population[rng.gen_range(0..population.len())].chromosome())
            .collect())
    }
}

/// Elitism selection
///
/// Draws parents from the fittest fraction of the population. The elite
/// group holds `clamp(n, fraction * len, len)` individuals, so it never
/// shrinks below the number of parents requested; the group is shuffled and
/// the first `n` members are returned.
///
/// Returned parents are distinct: the elite group is drawn without replacement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElitismParams")]
pub struct ElitismSelection {
    fraction: f64,
}

#[derive(Deserialize)]
struct ElitismParams {
    fraction: f64,
}

impl TryFrom<ElitismParams> for ElitismSelection {
    type Error = OperatorError;

    fn try_from(params: ElitismParams) -> Result<Self, Self::Error> {
        Self::new(params.fraction)
    }
}

impl ElitismSelection {
    /// Create a new elitism selection over the given top fraction
    pub fn new(fraction: f64) -> Result<Self, OperatorError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "elite fraction must be in [0, 1], got {fraction}"
            )));
        }
        Ok(Self { fraction })
    }

    /// Fraction of the population forming the elite group
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Size of the elite group for a population of `len` when `n` parents are needed
    ///
    /// Never exceeds `len`, even when more parents are requested than exist.
    pub fn elite_size(&self, n: usize, len: usize) -> usize {
        (self.fraction * len as f64).clamp(n.min(len) as f64, len as f64) as usize
    }
}

impl Selection for ElitismSelection {
    fn select<'a>(
        &self,
        population: &'a [Phenotype],
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<&'a Chromosome>, OperatorError> {
        ensure_selectable(n, population.len())?;

        // Rank without reordering the shared population
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| compare_fitness(population[b].fitness(), population[a].fitness()));
        ranked.truncate(self.elite_size(n, population.len()));
        ranked.shuffle(rng);

        Ok(ranked
            .into_iter()
            .take(n)
            .map(|i| population[i].chromosome())
            .collect())
    }
}

/// Tournament selection
///
/// For each parent, samples `size` distinct individuals at random and keeps
/// the fittest of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TournamentParams")]
pub struct TournamentSelection {
    size: usize,
}

#[derive(Deserialize)]
struct TournamentParams {
    size: usize,
}

impl TryFrom<TournamentParams> for TournamentSelection {
    type Error = OperatorError;

    fn try_from(params: TournamentParams) -> Result<Self, Self::Error> {
        Self::new(params.size)
    }
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(size: usize) -> Result<Self, OperatorError> {
        if size == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { size })
    }

    /// Create binary tournament selection (size = 2)
    pub fn binary() -> Self {
        Self { size: 2 }
    }

    /// Number of individuals competing in each tournament
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Selection for TournamentSelection {
    fn select<'a>(
        &self,
        population: &'a [Phenotype],
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<&'a Chromosome>, OperatorError> {
        ensure_selectable(n, population.len())?;

        let size = self.size.min(population.len());
        let mut selection = Vec::with_capacity(n);

        for _ in 0..n {
            let winner = population
                .choose_multiple(rng, size)
                .reduce(|best, p| if p.is_better_than(best) { p } else { best })
                .ok_or(OperatorError::SelectionSizeExceeded {
                    requested: n,
                    available: population.len(),
                })?;
            selection.push(winner.chromosome());
        }

        Ok(selection)
    }
}
