//! Gene type
//!
//! A gene is the smallest unit of genetic material: a fixed-length vector of
//! alleles, each a real number in [0, 1].

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// Fixed-length vector of alleles in [0, 1]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeneData")]
pub struct Gene {
    sequence: Vec<f64>,
}

#[derive(Deserialize)]
struct GeneData {
    sequence: Vec<f64>,
}

impl TryFrom<GeneData> for Gene {
    type Error = GenomeError;

    fn try_from(data: GeneData) -> Result<Self, Self::Error> {
        Self::from_values(data.sequence)
    }
}

impl Gene {
    /// Create a zero-valued gene of the given length
    pub fn new(length: usize) -> Result<Self, GenomeError> {
        if length == 0 {
            return Err(GenomeError::InvalidLength {
                what: "gene",
                length,
            });
        }
        Ok(Self {
            sequence: vec![0.0; length],
        })
    }

    /// Create a random gene of the given length
    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<Self, GenomeError> {
        let mut gene = Self::new(length)?;
        gene.randomize(rng);
        Ok(gene)
    }

    /// Create a gene from explicit allele values
    ///
    /// Every value must lie in [0, 1]. An empty vector is accepted and
    /// behaves as a no-op under every operator.
    pub fn from_values(values: Vec<f64>) -> Result<Self, GenomeError> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(GenomeError::OutOfRange { index, value });
        }
        Ok(Self { sequence: values })
    }

    /// Fill every allele with an independent uniform value in [0, 1)
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for allele in &mut self.sequence {
            *allele = rng.gen::<f64>();
        }
    }

    /// Number of alleles
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Check if the gene has no alleles
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Get the alleles
    pub fn values(&self) -> &[f64] {
        &self.sequence
    }

    /// Get mutable access to the alleles
    ///
    /// Mutation strategies must leave every allele in [0, 1].
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.sequence
    }

    /// Take the alleles out of this gene
    pub fn into_values(self) -> Vec<f64> {
        self.sequence
    }
}

impl std::ops::Index<usize> for Gene {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.sequence[index]
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, allele) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:.4}", allele)?;
        }
        write!(f, "]")
    }
}
