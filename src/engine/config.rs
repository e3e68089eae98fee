//! Engine configuration
//!
//! [`EngineSettings`] holds the serializable run parameters, including
//! tagged descriptions of the selection, crossover and mutation strategies.
//! [`ConfigurationBuilder`] turns settings plus an evaluator into a validated,
//! immutable [`Configuration`].

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::engine::engine::Engine;
use crate::error::{EvoResult, EvolutionError, OperatorError};
use crate::fitness::traits::Evaluator;
use crate::genome::chromosome::Chromosome;
use crate::operators::crossover::{NoCrossover, SinglePointCrossover, UniformCrossover};
use crate::operators::mutation::{GaussianMutation, UniformMutation};
use crate::operators::selection::{ElitismSelection, RandomSelection, TournamentSelection};
use crate::operators::traits::{Crossover, Mutation, Selection};

/// Callback invoked after every generation with its 0-based index
pub type Observer = Arc<dyn Fn(usize, &Engine) + Send + Sync>;

/// Hook that rewrites the random initial chromosomes before they are evaluated
///
/// Chromosomes must keep their shape and every allele must stay in [0, 1];
/// the engine checks both before seeding.
pub type Initializer = Arc<dyn Fn(&mut [Chromosome], &mut dyn RngCore) + Send + Sync>;

/// Serializable description of a selection strategy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionSpec {
    /// Uniform draws with replacement
    Random,
    /// Shuffled draws from the fittest fraction
    Elitism { fraction: f64 },
    /// Best of `size` random contenders
    Tournament { size: usize },
}

impl Default for SelectionSpec {
    fn default() -> Self {
        Self::Elitism { fraction: 0.1 }
    }
}

impl SelectionSpec {
    /// Instantiate the described strategy
    pub fn build(&self) -> Result<Arc<dyn Selection>, OperatorError> {
        let selection: Arc<dyn Selection> = match *self {
            Self::Random => Arc::new(RandomSelection),
            Self::Elitism { fraction } => Arc::new(ElitismSelection::new(fraction)?),
            Self::Tournament { size } => Arc::new(TournamentSelection::new(size)?),
        };
        Ok(selection)
    }
}

/// Serializable description of a crossover strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrossoverSpec {
    /// Offspring are mutated clones of single parents
    None,
    /// One pivot, two complementary children
    #[default]
    SinglePoint,
    /// Per-gene coin flip, two complementary children
    Uniform,
}

impl CrossoverSpec {
    /// Instantiate the described strategy
    pub fn build(&self) -> Arc<dyn Crossover> {
        match self {
            Self::None => Arc::new(NoCrossover),
            Self::SinglePoint => Arc::new(SinglePointCrossover),
            Self::Uniform => Arc::new(UniformCrossover),
        }
    }
}

/// Serializable description of a mutation strategy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationSpec {
    /// Resample alleles uniformly
    Uniform { probability: f64 },
    /// Add clamped normal noise to alleles
    Gaussian {
        probability: f64,
        std: f64,
        #[serde(default)]
        mean: f64,
    },
}

impl Default for MutationSpec {
    fn default() -> Self {
        Self::Uniform { probability: 0.1 }
    }
}

impl MutationSpec {
    /// Instantiate the described strategy
    pub fn build(&self) -> Result<Arc<dyn Mutation>, OperatorError> {
        let mutation: Arc<dyn Mutation> = match *self {
            Self::Uniform { probability } => Arc::new(UniformMutation::new(probability)?),
            Self::Gaussian {
                probability,
                std,
                mean,
            } => Arc::new(GaussianMutation::new(probability, std, mean)?),
        };
        Ok(mutation)
    }
}

/// Serializable run parameters
///
/// Missing fields take their default values when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Alleles per gene
    pub gene_length: usize,
    /// Genes per chromosome
    pub chromosome_length: usize,
    /// Phenotypes per generation
    pub population_size: usize,
    /// Oldest age an elite survivor may reach; `None` never retires elites
    pub max_age: Option<usize>,
    /// Fraction of each generation carried over as elite survivors
    pub elitism: f64,
    /// Generation budget
    pub iterations: usize,
    /// Parent selection strategy
    pub selection: SelectionSpec,
    /// Recombination strategy
    pub crossover: CrossoverSpec,
    /// Mutation strategy
    pub mutation: MutationSpec,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            gene_length: 1,
            chromosome_length: 10,
            population_size: 100,
            max_age: None,
            elitism: 0.1,
            iterations: 100,
            selection: SelectionSpec::default(),
            crossover: CrossoverSpec::default(),
            mutation: MutationSpec::default(),
        }
    }
}

impl EngineSettings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> EvoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty-printed JSON
    pub fn to_json(&self) -> EvoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validated, immutable run configuration
#[derive(Clone)]
pub struct Configuration {
    gene_length: usize,
    chromosome_length: usize,
    population_size: usize,
    max_age: usize,
    elitism: f64,
    iterations: usize,
    selection: Arc<dyn Selection>,
    crossover: Arc<dyn Crossover>,
    mutation: Arc<dyn Mutation>,
    evaluator: Arc<dyn Evaluator>,
    observer: Option<Observer>,
    initializer: Option<Initializer>,
}

impl Configuration {
    /// Create a builder with default settings
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Alleles per gene
    pub fn gene_length(&self) -> usize {
        self.gene_length
    }

    /// Genes per chromosome
    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }

    /// Phenotypes per generation
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Oldest age an elite survivor may reach
    pub fn max_age(&self) -> usize {
        self.max_age
    }

    /// Elite fraction
    pub fn elitism(&self) -> f64 {
        self.elitism
    }

    /// Number of elite survivors carried into each generation
    pub fn survivors(&self) -> usize {
        let size = self.population_size as f64;
        (self.elitism * size).clamp(0.0, size) as usize
    }

    /// Generation budget
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Parent selection strategy
    pub fn selection(&self) -> &dyn Selection {
        self.selection.as_ref()
    }

    /// Recombination strategy
    pub fn crossover(&self) -> &dyn Crossover {
        self.crossover.as_ref()
    }

    /// Mutation strategy
    pub fn mutation(&self) -> &dyn Mutation {
        self.mutation.as_ref()
    }

    /// Fitness evaluator
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Per-generation callback, if any
    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    /// Initial population hook, if any
    pub fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("gene_length", &self.gene_length)
            .field("chromosome_length", &self.chromosome_length)
            .field("population_size", &self.population_size)
            .field("max_age", &self.max_age)
            .field("elitism", &self.elitism)
            .field("iterations", &self.iterations)
            .field("selection", &self.selection)
            .field("crossover", &self.crossover)
            .field("mutation", &self.mutation)
            .field("observer", &self.observer.is_some())
            .field("initializer", &self.initializer.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Configuration`]
///
/// Strategies set directly take precedence over the specs in the settings.
#[derive(Default)]
pub struct ConfigurationBuilder {
    settings: EngineSettings,
    selection: Option<Arc<dyn Selection>>,
    crossover: Option<Arc<dyn Crossover>>,
    mutation: Option<Arc<dyn Mutation>>,
    evaluator: Option<Arc<dyn Evaluator>>,
    observer: Option<Observer>,
    initializer: Option<Initializer>,
}

impl ConfigurationBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all numeric parameters and strategy specs
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set alleles per gene
    pub fn gene_length(mut self, length: usize) -> Self {
        self.settings.gene_length = length;
        self
    }

    /// Set genes per chromosome
    pub fn chromosome_length(mut self, length: usize) -> Self {
        self.settings.chromosome_length = length;
        self
    }

    /// Set phenotypes per generation
    pub fn population_size(mut self, size: usize) -> Self {
        self.settings.population_size = size;
        self
    }

    /// Set the oldest age an elite survivor may reach
    pub fn max_age(mut self, age: usize) -> Self {
        self.settings.max_age = Some(age);
        self
    }

    /// Set the elite fraction
    pub fn elitism(mut self, fraction: f64) -> Self {
        self.settings.elitism = fraction;
        self
    }

    /// Set the generation budget
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.settings.iterations = iterations;
        self
    }

    /// Set the selection strategy
    pub fn selection<S: Selection + 'static>(mut self, selection: S) -> Self {
        self.selection = Some(Arc::new(selection));
        self
    }

    /// Set the crossover strategy
    pub fn crossover<C: Crossover + 'static>(mut self, crossover: C) -> Self {
        self.crossover = Some(Arc::new(crossover));
        self
    }

    /// Set the mutation strategy
    pub fn mutation<M: Mutation + 'static>(mut self, mutation: M) -> Self {
        self.mutation = Some(Arc::new(mutation));
        self
    }

    /// Set the fitness evaluator
    pub fn evaluator<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Set the per-generation callback
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(usize, &Engine) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Set the hook that shapes the initial population
    pub fn initializer<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&mut [Chromosome], &mut dyn RngCore) + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(initializer));
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> EvoResult<Configuration> {
        let settings = self.settings;

        if settings.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "population size must be positive".to_string(),
            ));
        }
        if settings.chromosome_length == 0 {
            return Err(EvolutionError::Configuration(
                "chromosome length must be positive".to_string(),
            ));
        }
        if settings.gene_length == 0 {
            return Err(EvolutionError::Configuration(
                "gene length must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&settings.elitism) {
            return Err(EvolutionError::Configuration(format!(
                "elitism must be in [0, 1], got {}",
                settings.elitism
            )));
        }

        let selection = match self.selection {
            Some(selection) => selection,
            None => settings.selection.build()?,
        };
        let crossover = self
            .crossover
            .unwrap_or_else(|| settings.crossover.build());
        let mutation = match self.mutation {
            Some(mutation) => mutation,
            None => settings.mutation.build()?,
        };

        if crossover.children() == 0 {
            return Err(EvolutionError::Configuration(
                "crossover must produce at least one child".to_string(),
            ));
        }

        let evaluator = self.evaluator.ok_or_else(|| {
            EvolutionError::Configuration("Evaluator must be specified".to_string())
        })?;

        Ok(Configuration {
            gene_length: settings.gene_length,
            chromosome_length: settings.chromosome_length,
            population_size: settings.population_size,
            max_age: settings.max_age.unwrap_or(usize::MAX),
            elitism: settings.elitism,
            iterations: settings.iterations,
            selection,
            crossover,
            mutation,
            evaluator,
            observer: self.observer,
            initializer: self.initializer,
        })
    }
}
