//! Chromosome type
//!
//! A chromosome is the full encoding of one candidate solution: an ordered,
//! fixed-length sequence of genes of equal length.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::gene::Gene;
use crate::operators::traits::Mutation;

/// Ordered sequence of genes encoding one candidate solution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChromosomeData")]
pub struct Chromosome {
    genes: Vec<Gene>,
}

#[derive(Deserialize)]
struct ChromosomeData {
    genes: Vec<Gene>,
}

impl TryFrom<ChromosomeData> for Chromosome {
    type Error = GenomeError;

    fn try_from(data: ChromosomeData) -> Result<Self, Self::Error> {
        Self::from_genes(data.genes)
    }
}

impl Chromosome {
    /// Create a zero-valued chromosome of `length` genes, each `gene_length` long
    pub fn new(length: usize, gene_length: usize) -> Result<Self, GenomeError> {
        if length == 0 {
            return Err(GenomeError::InvalidLength {
                what: "chromosome",
                length,
            });
        }
        let gene = Gene::new(gene_length)?;
        Ok(Self {
            genes: vec![gene; length],
        })
    }

    /// Create a chromosome with every allele drawn uniformly from [0, 1)
    pub fn random<R: Rng + ?Sized>(
        length: usize,
        gene_length: usize,
        rng: &mut R,
    ) -> Result<Self, GenomeError> {
        let mut chromosome = Self::new(length, gene_length)?;
        chromosome.randomize(rng);
        Ok(chromosome)
    }

    /// Build a chromosome from existing genes
    ///
    /// All genes must share the same length.
    pub fn from_genes(genes: Vec<Gene>) -> Result<Self, GenomeError> {
        let first = genes.first().ok_or(GenomeError::InvalidLength {
            what: "chromosome",
            length: 0,
        })?;
        let expected = first.len();
        if let Some(gene) = genes.iter().find(|g| g.len() != expected) {
            return Err(GenomeError::DimensionMismatch {
                expected,
                actual: gene.len(),
            });
        }
        Ok(Self { genes })
    }

    /// Randomize every gene
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for gene in &mut self.genes {
            gene.randomize(rng);
        }
    }

    /// Apply a mutation strategy to every gene in place
    pub fn mutate(&mut self, mutation: &dyn Mutation, rng: &mut dyn RngCore) {
        for gene in &mut self.genes {
            mutation.mutate(gene, rng);
        }
    }

    /// Number of genes
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Check if the chromosome has no genes
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Length of each gene
    pub fn gene_length(&self) -> usize {
        self.genes.first().map_or(0, Gene::len)
    }

    /// Get the genes
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Get mutable access to the genes
    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    /// Take the genes out of this chromosome
    pub fn into_genes(self) -> Vec<Gene> {
        self.genes
    }

    /// Check that another chromosome has the same shape
    pub fn ensure_same_shape(&self, other: &Self) -> Result<(), GenomeError> {
        if self.len() != other.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        if self.gene_length() != other.gene_length() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.gene_length(),
                actual: other.gene_length(),
            });
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Chromosome {
    type Output = Gene;

    fn index(&self, index: usize) -> &Self::Output {
        &self.genes[index]
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", gene)?;
        }
        write!(f, "]")
    }
}
