//! Crossover operators
//!
//! This module provides the crossover operators. Children never share
//! storage with their parents: every inherited gene is cloned.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::OperatorError;
use crate::genome::chromosome::Chromosome;
use crate::genome::gene::Gene;
use crate::operators::traits::{ensure_two_parents, Crossover};

/// Pass-through crossover
///
/// Returns a clone of each parent unchanged. Used when recombination is
/// disabled; offspring then differ from their parents by mutation only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoCrossover;

impl NoCrossover {
    /// Create a new pass-through crossover
    pub fn new() -> Self {
        Self
    }
}

impl Crossover for NoCrossover {
    fn cross(
        &self,
        parents: &[&Chromosome],
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        Ok(parents.iter().map(|&p| p.clone()).collect())
    }

    fn children(&self) -> usize {
        1
    }
}

/// Single-point crossover
///
/// Picks a pivot gene index uniformly in `[0, length)`; the first child takes
/// genes before the pivot from the first parent and the rest from the
/// second, the other child the complement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinglePointCrossover;

impl SinglePointCrossover {
    /// Create a new single-point crossover
    pub fn new() -> Self {
        Self
    }

    /// Recombine around a fixed pivot
    pub fn cross_at(
        mother: &Chromosome,
        father: &Chromosome,
        pivot: usize,
    ) -> Result<(Chromosome, Chromosome), OperatorError> {
        let (mother, father) = ensure_two_parents(&[mother, father])?;
        let pivot = pivot.min(mother.len());

        let splice = |head: &Chromosome, tail: &Chromosome| -> Vec<Gene> {
            head.genes()[..pivot]
                .iter()
                .chain(&tail.genes()[pivot..])
                .cloned()
                .collect()
        };

        let first = Chromosome::from_genes(splice(mother, father))?;
        let second = Chromosome::from_genes(splice(father, mother))?;
        Ok((first, second))
    }
}

impl Crossover for SinglePointCrossover {
    fn cross(
        &self,
        parents: &[&Chromosome],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let (mother, father) = ensure_two_parents(parents)?;
        let pivot = if mother.is_empty() {
            0
        } else {
            rng.gen_range(0..mother.len())
        };
        let (first, second) = Self::cross_at(mother, father, pivot)?;
        Ok(vec![first, second])
    }

    fn children(&self) -> usize {
        2
    }
}

/// Uniform crossover
///
/// Flips an independent fair coin per gene position to decide which parent
/// each child inherits that gene from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformCrossover;

impl UniformCrossover {
    /// Create a new uniform crossover
    pub fn new() -> Self {
        Self
    }
}

impl Crossover for UniformCrossover {
    fn cross(
        &self,
        parents: &[&Chromosome],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let (mother, father) = ensure_two_parents(parents)?;

        let mut first = Vec::with_capacity(mother.len());
        let mut second = Vec::with_capacity(mother.len());

        for (m, f) in mother.genes().iter().zip(father.genes()) {
            if rng.gen::<f64>() < 0.5 {
                first.push(m.clone());
                second.push(f.clone());
            } else {
                first.push(f.clone());
                second.push(m.clone());
            }
        }

        Ok(vec![
            Chromosome::from_genes(first)?,
            Chromosome::from_genes(second)?,
        ])
    }

    fn children(&self) -> usize {
        2
    }
}
