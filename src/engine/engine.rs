//! Generational engine
//!
//! This module implements the generation loop: elite survivors with aging,
//! then offspring produced concurrently by select, cross, mutate and
//! evaluate batches until the population is refilled.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use log::{debug, error, info, warn};
use rand::RngCore;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::diagnostics::{EvolutionStats, GenerationStats, RunSummary};
use crate::engine::config::Configuration;
use crate::engine::control::{EngineState, SharedState, StopHandle};
use crate::error::{EvoResult, EvolutionError, GenomeError};
use crate::genome::chromosome::Chromosome;
use crate::population::phenotype::Phenotype;
use crate::population::population::Population;

/// Evolutionary engine
///
/// Owns the current population and drives it through `iterations`
/// generations. The run can be halted from the observer or from any thread
/// holding a [`StopHandle`].
pub struct Engine {
    configuration: Configuration,
    population: Population,
    state: SharedState,
    stats: EvolutionStats,
    generation: usize,
}

impl Engine {
    /// Create an idle engine
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            population: Population::new(),
            state: SharedState::default(),
            stats: EvolutionStats::new(),
            generation: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Current population
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Run configuration
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Statistics recorded so far in the current run
    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }

    /// Number of generations completed in the current run
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Handle for stopping the engine from another thread
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(self.state.clone())
    }

    /// Request a stop; takes effect before the next generation
    ///
    /// Does nothing unless the engine is running.
    pub fn stop(&self) {
        if self.state.transition(EngineState::Running, EngineState::Stopped) {
            debug!("stop requested at generation {}", self.generation);
        }
    }

    /// Fittest phenotype of the current population
    pub fn best(&self) -> EvoResult<&Phenotype> {
        self.population.best().ok_or(EvolutionError::EmptyPopulation)
    }

    /// Least fit phenotype of the current population
    pub fn worst(&self) -> EvoResult<&Phenotype> {
        self.population.worst().ok_or(EvolutionError::EmptyPopulation)
    }

    /// Run to completion
    ///
    /// Seeds a fresh random population, then produces generations until the
    /// iteration budget is used up or a stop is requested. Any strategy
    /// failure aborts the run, leaves the engine stopped and is returned.
    pub fn start(&mut self) -> EvoResult<RunSummary> {
        self.state.set(EngineState::Running);
        self.generation = 0;
        self.stats = EvolutionStats::new();

        info!(
            "starting evolution: population {}, {} generations, {} survivors per generation",
            self.configuration.population_size(),
            self.configuration.iterations(),
            self.configuration.survivors()
        );

        let started = Instant::now();
        if let Err(e) = self.run() {
            self.state.set(EngineState::Stopped);
            error!("evolution aborted at generation {}: {}", self.generation, e);
            return Err(e);
        }
        let elapsed = started.elapsed();

        let state = self.state.get();
        let best = self.best()?.clone();
        info!(
            "evolution {} after {} generations in {:?}, best fitness {:.6}",
            state,
            self.generation,
            elapsed,
            best.fitness()
        );

        Ok(RunSummary {
            best,
            elapsed,
            generations: self.generation,
            state,
            stats: self.stats.clone(),
        })
    }

    fn run(&mut self) -> EvoResult<()> {
        self.population = self.seed()?;

        for generation in 0..self.configuration.iterations() {
            if self.state.get() != EngineState::Running {
                warn!("stop observed before generation {generation}, halting");
                return Ok(());
            }

            self.step(generation)?;
            self.generation = generation + 1;

            if let Some(observer) = self.configuration.observer().cloned() {
                observer(generation, &*self);
            }
        }

        self.state
            .transition(EngineState::Running, EngineState::Exhausted);
        Ok(())
    }

    fn seed(&self) -> EvoResult<Population> {
        let configuration = &self.configuration;
        let mut rng = rand::thread_rng();

        let mut chromosomes = (0..configuration.population_size())
            .map(|_| {
                Chromosome::random(
                    configuration.chromosome_length(),
                    configuration.gene_length(),
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(initializer) = configuration.initializer() {
            initializer(&mut chromosomes, &mut rng);
            for chromosome in &chromosomes {
                check_seeded(
                    chromosome,
                    configuration.chromosome_length(),
                    configuration.gene_length(),
                )?;
            }
            debug!("initializer applied to {} chromosomes", chromosomes.len());
        }

        Ok(Population::evaluate_parallel(
            chromosomes,
            configuration.evaluator(),
        ))
    }

    fn step(&mut self, generation: usize) -> EvoResult<()> {
        let started = Instant::now();

        self.population.sort_by_fitness();
        let (survivors, retired) = elite_survivors(
            self.population.phenotypes(),
            self.configuration.survivors(),
            self.configuration.max_age(),
        );
        let kept = survivors.len();

        let next = produce_offspring(
            &self.configuration,
            self.population.phenotypes(),
            survivors,
        )?;
        self.population = Population::from_phenotypes(next);

        let stats = GenerationStats::from_population(&self.population, generation)
            .with_elites(kept, retired)
            .with_elapsed(started.elapsed());
        debug!(
            "generation {}: best {:.6}, mean {:.6}, worst {:.6}, {} survivors, {} retired",
            generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.worst_fitness,
            kept,
            retired
        );
        self.stats.record(stats);

        Ok(())
    }
}

/// Reject initializer output that changed shape or left [0, 1]
fn check_seeded(
    chromosome: &Chromosome,
    length: usize,
    gene_length: usize,
) -> Result<(), GenomeError> {
    if chromosome.len() != length {
        return Err(GenomeError::DimensionMismatch {
            expected: length,
            actual: chromosome.len(),
        });
    }
    for gene in chromosome.genes() {
        if gene.len() != gene_length {
            return Err(GenomeError::DimensionMismatch {
                expected: gene_length,
                actual: gene.len(),
            });
        }
        if let Some((index, &value)) = gene
            .values()
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(GenomeError::OutOfRange { index, value });
        }
    }
    Ok(())
}

/// Carry over up to `survivors` phenotypes from a sorted population
///
/// Every examined phenotype ages by one; those older than `max_age` are
/// retired and the walk continues down the ranking. Returns the kept
/// phenotypes and the number retired.
fn elite_survivors(
    sorted: &[Phenotype],
    survivors: usize,
    max_age: usize,
) -> (Vec<Phenotype>, usize) {
    let mut kept = Vec::with_capacity(survivors);
    let mut retired = 0;

    for phenotype in sorted {
        if kept.len() >= survivors {
            break;
        }
        let mut elder = phenotype.clone();
        if elder.grow_older() <= max_age {
            kept.push(elder);
        } else {
            retired += 1;
        }
    }

    (kept, retired)
}

/// Refill the population after the survivors
///
/// Runs `ceil(missing / arity)` independent batches, each appending `arity`
/// freshly evaluated children to the shared accumulator, then truncates to
/// the configured size.
fn produce_offspring(
    configuration: &Configuration,
    parents: &[Phenotype],
    survivors: Vec<Phenotype>,
) -> EvoResult<Vec<Phenotype>> {
    let size = configuration.population_size();
    let arity = configuration.crossover().children();
    let batches = size.saturating_sub(survivors.len()).div_ceil(arity);

    let mut seeded = survivors;
    seeded.reserve(batches * arity);
    let offspring = Mutex::new(seeded);

    let run_batch = |_: usize| -> EvoResult<()> {
        let mut rng = rand::thread_rng();
        let children = breed(configuration, parents, &mut rng)?;
        offspring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(children);
        Ok(())
    };

    #[cfg(feature = "parallel")]
    (0..batches).into_par_iter().try_for_each(run_batch)?;
    #[cfg(not(feature = "parallel"))]
    (0..batches).try_for_each(run_batch)?;

    let mut next = offspring
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    next.truncate(size);
    Ok(next)
}

/// Select parents, recombine, mutate and evaluate one batch of children
fn breed(
    configuration: &Configuration,
    parents: &[Phenotype],
    rng: &mut dyn RngCore,
) -> EvoResult<Vec<Phenotype>> {
    let crossover = configuration.crossover();
    let selected = configuration
        .selection()
        .select(parents, crossover.children(), rng)?;
    let children = crossover.cross(&selected, rng)?;

    Ok(children
        .into_iter()
        .map(|mut child| {
            child.mutate(configuration.mutation(), rng);
            Phenotype::evaluate(child, configuration.evaluator())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::engine::config::ConfigurationBuilder;
    use crate::error::OperatorError;
    use crate::fitness::benchmarks::CountAbove;
    use crate::operators::crossover::{NoCrossover, SinglePointCrossover};
    use crate::operators::mutation::UniformMutation;
    use crate::operators::selection::{RandomSelection, TournamentSelection};

    fn builder() -> ConfigurationBuilder {
        Configuration::builder()
            .gene_length(2)
            .chromosome_length(5)
            .population_size(20)
            .elitism(0.2)
            .iterations(10)
            .selection(TournamentSelection::binary())
            .crossover(SinglePointCrossover)
            .mutation(UniformMutation::new(0.2).unwrap())
            .evaluator(CountAbove::midpoint())
    }

    #[test]
    fn test_new_engine_is_idle_and_empty() {
        let engine = Engine::new(builder().build().unwrap());

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.generation(), 0);
        assert!(matches!(engine.best(), Err(EvolutionError::EmptyPopulation)));
        assert!(matches!(engine.worst(), Err(EvolutionError::EmptyPopulation)));
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let engine = Engine::new(builder().build().unwrap());
        engine.stop();
        engine.stop();
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_run_exhausts_iterations() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = builder()
            .observer(move |generation, engine: &Engine| {
                assert_eq!(engine.population().len(), 20);
                assert_eq!(engine.generation(), generation + 1);
                assert_eq!(engine.state(), EngineState::Running);
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let mut engine = Engine::new(config);
        let summary = engine.start().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(summary.generations, 10);
        assert_eq!(summary.state, EngineState::Exhausted);
        assert_eq!(summary.stats.num_generations(), 10);
        assert_eq!(engine.state(), EngineState::Exhausted);
        assert_eq!(summary.best.fitness(), engine.best().unwrap().fitness());
    }

    #[test]
    fn test_zero_iterations() {
        let mut engine = Engine::new(builder().iterations(0).build().unwrap());
        let summary = engine.start().unwrap();

        assert_eq!(summary.generations, 0);
        assert_eq!(summary.state, EngineState::Exhausted);
        assert_eq!(engine.population().len(), 20);
    }

    #[test]
    fn test_initializer_shapes_seed_population() {
        // One gene per chromosome at 0.6, the rest at 0.3
        let config = builder()
            .gene_length(1)
            .iterations(0)
            .initializer(|chromosomes: &mut [Chromosome], rng: &mut dyn RngCore| {
                for chromosome in chromosomes.iter_mut() {
                    for gene in chromosome.genes_mut() {
                        gene.values_mut()[0] = 0.3;
                    }
                    let hot = (rng.next_u32() as usize) % chromosome.len();
                    chromosome.genes_mut()[hot].values_mut()[0] = 0.6;
                }
            })
            .build()
            .unwrap();

        let mut engine = Engine::new(config);
        engine.start().unwrap();

        assert_eq!(engine.population().len(), 20);
        for phenotype in engine.population().iter() {
            let values: Vec<f64> = phenotype.chromosome().genes().iter().map(|g| g[0]).collect();
            assert_eq!(values.iter().filter(|&&v| v == 0.6).count(), 1);
            assert_eq!(values.iter().filter(|&&v| v == 0.3).count(), 4);
            assert_eq!(phenotype.fitness(), 1.0);
        }
    }

    #[test]
    fn test_initializer_output_is_checked() {
        let config = builder()
            .initializer(|chromosomes: &mut [Chromosome], _: &mut dyn RngCore| {
                chromosomes[0].genes_mut()[1].values_mut()[0] = 1.5;
            })
            .build()
            .unwrap();

        let mut engine = Engine::new(config);
        let err = engine.start().unwrap_err();

        assert!(matches!(
            err,
            EvolutionError::Genome(GenomeError::OutOfRange { index: 0, value }) if value == 1.5
        ));
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn test_check_seeded_rejects_reshaped_chromosomes() {
        let chromosome = Chromosome::new(3, 2).unwrap();
        assert!(check_seeded(&chromosome, 3, 2).is_ok());
        assert_eq!(
            check_seeded(&chromosome, 4, 2),
            Err(GenomeError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            check_seeded(&chromosome, 3, 1),
            Err(GenomeError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_odd_population_with_two_children() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&sizes);
        let config = builder()
            .population_size(51)
            .elitism(0.0)
            .observer(move |_, engine: &Engine| {
                seen.lock().unwrap().push(engine.population().len());
            })
            .build()
            .unwrap();

        Engine::new(config).start().unwrap();
        let sizes = sizes.lock().unwrap();
        assert_eq!(sizes.len(), 10);
        assert!(sizes.iter().all(|&len| len == 51));
    }

    #[test]
    fn test_stop_from_observer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = builder()
            .iterations(100)
            .observer(move |generation, engine: &Engine| {
                counter.fetch_add(1, Ordering::SeqCst);
                if generation == 2 {
                    engine.stop();
                    engine.stop();
                }
            })
            .build()
            .unwrap();

        let mut engine = Engine::new(config);
        let summary = engine.start().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.generations, 3);
        assert_eq!(summary.state, EngineState::Stopped);
    }

    #[test]
    fn test_elite_ages_bounded() {
        let ok = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&ok);
        let config = builder()
            .elitism(0.5)
            .max_age(2)
            .iterations(20)
            .observer(move |_, engine: &Engine| {
                if engine.population().iter().any(|p| p.age() > 2) {
                    flag.store(false, Ordering::SeqCst);
                }
            })
            .build()
            .unwrap();

        let summary = Engine::new(config).start().unwrap();
        assert!(ok.load(Ordering::SeqCst));
        assert!(summary.stats.total_retired() > 0);
    }

    #[test]
    fn test_offspring_start_at_age_zero() {
        let config = builder().elitism(0.0).iterations(3).build().unwrap();
        let mut engine = Engine::new(config);
        engine.start().unwrap();
        assert!(engine.population().iter().all(|p| p.age() == 0));
    }

    #[test]
    fn test_selection_failure_aborts_run() {
        let config = builder()
            .population_size(1)
            .elitism(0.0)
            .selection(RandomSelection)
            .build()
            .unwrap();

        let mut engine = Engine::new(config);
        let err = engine.start().unwrap_err();

        assert!(matches!(
            err,
            EvolutionError::Operator(OperatorError::SelectionSizeExceeded {
                requested: 2,
                available: 1
            })
        ));
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn test_single_parent_population_without_crossover() {
        let config = builder()
            .population_size(1)
            .elitism(0.0)
            .crossover(NoCrossover)
            .build()
            .unwrap();

        let summary = Engine::new(config).start().unwrap();
        assert_eq!(summary.state, EngineState::Exhausted);
    }

    #[test]
    fn test_restart_reseeds() {
        let mut engine = Engine::new(builder().iterations(3).build().unwrap());
        engine.start().unwrap();
        let summary = engine.start().unwrap();

        assert_eq!(summary.generations, 3);
        assert_eq!(engine.stats().num_generations(), 3);
    }

    #[test]
    fn test_stop_handle_from_other_thread() {
        let config = builder().population_size(4).iterations(1_000_000).build().unwrap();
        let mut engine = Engine::new(config);
        let handle = engine.stop_handle();

        let stopper = std::thread::spawn(move || {
            while handle.state() == EngineState::Idle {
                std::thread::yield_now();
            }
            handle.stop();
        });

        let summary = engine.start().unwrap();
        stopper.join().unwrap();

        assert_eq!(summary.state, EngineState::Stopped);
        assert!(summary.generations < 1_000_000);
        assert_eq!(engine.stats().num_generations(), summary.generations);
    }

    #[test]
    fn test_elite_survivors_retire_old() {
        let chromosome = Chromosome::new(1, 1).unwrap();
        let sorted: Vec<Phenotype> = (0..5)
            .rev()
            .map(|f| Phenotype::new(chromosome.clone(), f as f64))
            .collect();

        let (kept, retired) = elite_survivors(&sorted, 2, usize::MAX);
        assert_eq!(retired, 0);
        assert_eq!(kept.iter().map(Phenotype::fitness).collect::<Vec<_>>(), vec![4.0, 3.0]);
        assert!(kept.iter().all(|p| p.age() == 1));

        let (kept, retired) = elite_survivors(&kept, 2, 1);
        assert!(kept.is_empty());
        assert_eq!(retired, 2);
    }
}
