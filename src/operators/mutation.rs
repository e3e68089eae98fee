//! Mutation operators
//!
//! This module provides the mutation operators. Both apply independently to
//! every allele of a gene and leave each allele in [0, 1].

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::OperatorError;
use crate::genome::gene::Gene;
use crate::operators::traits::Mutation;

fn validate_probability(probability: f64) -> Result<f64, OperatorError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(OperatorError::InvalidConfiguration(format!(
            "probability must be in [0, 1], got {probability}"
        )));
    }
    Ok(probability)
}

/// Uniform mutation
///
/// Replaces each allele, with the given probability, by a fresh uniform value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniformParams")]
pub struct UniformMutation {
    probability: f64,
}

#[derive(Deserialize)]
struct UniformParams {
    probability: f64,
}

impl TryFrom<UniformParams> for UniformMutation {
    type Error = OperatorError;

    fn try_from(params: UniformParams) -> Result<Self, Self::Error> {
        Self::new(params.probability)
    }
}

impl UniformMutation {
    /// Create a new uniform mutation with the given per-allele probability
    pub fn new(probability: f64) -> Result<Self, OperatorError> {
        Ok(Self {
            probability: validate_probability(probability)?,
        })
    }

    /// Per-allele mutation probability
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation for UniformMutation {
    fn mutate(&self, gene: &mut Gene, rng: &mut dyn RngCore) {
        for allele in gene.values_mut() {
            if rng.gen::<f64>() < self.probability {
                *allele = rng.gen::<f64>();
            }
        }
    }
}

/// Gaussian mutation
///
/// Adds `Normal(mean, std)` noise to each allele with the given probability,
/// then clamps the result into [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct GaussianMutation {
    probability: f64,
    normal: Normal<f64>,
}

impl GaussianMutation {
    /// Create a new Gaussian mutation
    pub fn new(probability: f64, std: f64, mean: f64) -> Result<Self, OperatorError> {
        let probability = validate_probability(probability)?;
        if !mean.is_finite() {
            return Err(OperatorError::InvalidConfiguration(format!(
                "mean must be finite, got {mean}"
            )));
        }
        if !(std >= 0.0 && std.is_finite()) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "standard deviation must be finite and non-negative, got {std}"
            )));
        }
        let normal = Normal::new(mean, std).map_err(|e| {
            OperatorError::InvalidConfiguration(format!("invalid standard deviation {std}: {e}"))
        })?;
        Ok(Self { probability, normal })
    }

    /// Per-allele mutation probability
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Standard deviation of the noise
    pub fn std(&self) -> f64 {
        self.normal.std_dev()
    }

    /// Mean of the noise
    pub fn mean(&self) -> f64 {
        self.normal.mean()
    }
}

impl Mutation for GaussianMutation {
    fn mutate(&self, gene: &mut Gene, rng: &mut dyn RngCore) {
        for allele in gene.values_mut() {
            if rng.gen::<f64>() < self.probability {
                *allele = (*allele + self.normal.sample(rng)).clamp(0.0, 1.0);
            }
        }
    }
}
