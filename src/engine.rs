//! The generational orchestration engine.
//!
//! [`Engine`] owns the population, the policy knobs, and the random stream,
//! and drives the generation loop: sort → track best → convergence check →
//! progress callback → selection/crossover/mutation → wholesale replacement.
//!
//! The loop is strictly single-threaded and synchronous. Concurrency happens
//! at the granularity of whole engines: independent instances share nothing
//! and may run in parallel on separate threads.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::chromosome::Chromosome;
use crate::config::{ConfigError, EngineConfig};
use crate::random::RandomStream;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The configured generation budget was exhausted.
    Completed,
    /// Best fitness stalled for the configured convergence window.
    Converged,
}

/// Statistics for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Why the run stopped.
    pub termination: Termination,
    /// Number of generations examined, including the one that triggered
    /// convergence.
    pub generations_run: usize,
}

/// A failed run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration was rejected before any generation ran.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// A custom selector broke its contract by returning no parents for a
    /// non-empty population.
    #[error("selector returned no parents for a non-empty population")]
    SelectionFailed,
}

/// The generational orchestrator.
///
/// Built from an [`EngineConfig`]; the random stream is created once at
/// construction (seeded if the config carries a seed, OS entropy otherwise)
/// and reused for the whole run.
///
/// ```ignore
/// let mut engine = Engine::new(EngineConfig::new(population).with_seed(42));
/// let report = engine.run()?;
/// let best = engine.best().expect("at least one generation ran");
/// ```
pub struct Engine<C: Chromosome> {
    config: EngineConfig<C>,
    rng: RandomStream,
    best: Option<C>,
}

impl<C: Chromosome> Engine<C> {
    /// Creates an engine from a configuration. Validation is deferred to
    /// [`run`](Self::run) so that a rejected configuration is reported as a
    /// run failure rather than a construction panic.
    pub fn new(config: EngineConfig<C>) -> Self {
        let rng = match config.seed {
            Some(seed) => RandomStream::seeded(seed),
            None => RandomStream::from_entropy(),
        };
        Self {
            config,
            rng,
            best: None,
        }
    }

    /// Runs the generation loop to completion, convergence, or validation
    /// failure.
    ///
    /// On a validation failure no generation runs and [`best`](Self::best)
    /// stays unset. Both [`Termination::Completed`] and
    /// [`Termination::Converged`] are successful outcomes.
    pub fn run(&mut self) -> Result<RunReport, EngineError> {
        self.config.validate()?;

        let population_size = self.config.population.len();
        let mut last_recorded_best = 0.0_f64;
        let mut stalled_generations = 0_usize;

        for generation in 0..self.config.generations {
            // Stable descending sort: ties keep their prior order.
            self.config.population.sort_by(|a, b| {
                b.fitness()
                    .partial_cmp(&a.fitness())
                    .unwrap_or(Ordering::Equal)
            });

            let current_best = self.config.population[0].fitness();
            let improved_tracker = match &self.best {
                None => true,
                Some(best) => current_best > best.fitness(),
            };
            if improved_tracker {
                self.best = Some(self.config.population[0].clone());
            }

            if let Some(convergence) = self.config.convergence {
                if convergence.window > 0 {
                    let improvement = current_best - last_recorded_best;
                    if improvement > convergence.epsilon {
                        stalled_generations = 0;
                        last_recorded_best = current_best;
                    } else {
                        stalled_generations += 1;
                        if stalled_generations >= convergence.window {
                            if let (Some(callback), Some(best)) =
                                (self.config.progress.as_mut(), self.best.as_ref())
                            {
                                callback(generation, best);
                            }
                            info!(
                                generation,
                                best_fitness = current_best,
                                window = convergence.window,
                                "stopping early: best fitness stalled"
                            );
                            return Ok(RunReport {
                                termination: Termination::Converged,
                                generations_run: generation + 1,
                            });
                        }
                    }
                }
            }

            if let (Some(callback), Some(best)) =
                (self.config.progress.as_mut(), self.best.as_ref())
            {
                callback(generation, best);
            }

            debug!(generation, best_fitness = current_best, "generation examined");

            // Build the replacement generation, same size, 1:1.
            let mut next = Vec::with_capacity(population_size);
            if self.config.elitism {
                if let Some(best) = &self.best {
                    next.push(best.clone());
                }
            }
            while next.len() < population_size {
                let (first_parent, second_parent) = self
                    .config
                    .selector
                    .select(&self.config.population, &self.rng)
                    .ok_or(EngineError::SelectionFailed)?;

                let mut offspring = if self.rng.chance(self.config.crossover_rate) {
                    self.config.population[first_parent]
                        .crossover(&self.config.population[second_parent], &self.rng)
                } else {
                    self.config.population[first_parent].clone()
                };

                if self.rng.chance(self.config.mutation_rate) {
                    offspring.mutate(&self.rng);
                }

                next.push(offspring);
            }
            self.config.population = next;
        }

        info!(
            generations = self.config.generations,
            "generation budget exhausted"
        );
        Ok(RunReport {
            termination: Termination::Completed,
            generations_run: self.config.generations,
        })
    }

    /// Returns the best chromosome observed across all examined generations,
    /// or `None` if no generation has completed.
    pub fn best(&self) -> Option<&C> {
        self.best.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Arc, Mutex};

    /// Fitness-valued chromosome: crossover averages, mutation nudges up.
    #[derive(Clone)]
    struct Scored {
        score: f64,
    }

    impl Chromosome for Scored {
        fn fitness(&self) -> f64 {
            self.score
        }

        fn crossover(&self, other: &Self, _rng: &RandomStream) -> Self {
            Scored {
                score: (self.score + other.score) / 2.0,
            }
        }

        fn mutate(&mut self, _rng: &RandomStream) {
            self.score += 0.1;
        }
    }

    fn scored_population(scores: &[f64]) -> Vec<Scored> {
        scores.iter().map(|&score| Scored { score }).collect()
    }

    /// Bitstring one-max chromosome exercising real random operators.
    #[derive(Clone)]
    struct BitString {
        genes: Vec<bool>,
    }

    impl BitString {
        fn random(bits: usize, rng: &RandomStream) -> Self {
            let genes = (0..bits).map(|_| rng.chance(0.5)).collect();
            Self { genes }
        }
    }

    impl Chromosome for BitString {
        fn fitness(&self) -> f64 {
            self.genes.iter().filter(|&&g| g).count() as f64
        }

        fn crossover(&self, other: &Self, rng: &RandomStream) -> Self {
            if self.genes.len() != other.genes.len() {
                return self.clone();
            }
            let point = rng.index(self.genes.len());
            let mut genes = self.genes[..point].to_vec();
            genes.extend_from_slice(&other.genes[point..]);
            Self { genes }
        }

        fn mutate(&mut self, rng: &RandomStream) {
            let i = rng.index(self.genes.len());
            self.genes[i] = !self.genes[i];
        }
    }

    fn bit_population(count: usize, bits: usize, seed: u64) -> Vec<BitString> {
        let rng = RandomStream::seeded(seed);
        (0..count).map(|_| BitString::random(bits, &rng)).collect()
    }

    #[test]
    fn test_onemax_improves() {
        let population = bit_population(50, 20, 1);
        let initial_best = population
            .iter()
            .map(Chromosome::fitness)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut engine = Engine::new(
            EngineConfig::new(population)
                .with_generations(100)
                .with_mutation_rate(0.1)
                .with_seed(42),
        );
        let report = engine.run().expect("valid configuration");

        assert_eq!(report.termination, Termination::Completed);
        assert_eq!(report.generations_run, 100);
        let best = engine.best().expect("a generation completed");
        assert!(
            best.fitness() >= initial_best,
            "best should never fall below the initial population's best"
        );
        assert!(
            best.fitness() >= 15.0,
            "expected near-optimal one-max fitness, got {}",
            best.fitness()
        );
    }

    #[test]
    fn test_best_is_monotonically_non_decreasing() {
        let history = Arc::new(Mutex::new(Vec::new()));
        let sink = history.clone();

        let mut engine = Engine::new(
            EngineConfig::new(bit_population(30, 16, 2))
                .with_generations(60)
                .with_mutation_rate(0.2)
                .with_seed(7)
                .with_progress(move |_generation, best: &BitString| {
                    sink.lock().expect("no poisoned lock").push(best.fitness());
                }),
        );
        engine.run().expect("valid configuration");

        let history = history.lock().expect("no poisoned lock");
        assert_eq!(history.len(), 60);
        for window in history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best-so-far regressed: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_identical_seeds_reproduce_identical_results() {
        let run = |seed: u64| {
            let mut engine = Engine::new(
                EngineConfig::new(bit_population(30, 20, 5))
                    .with_generations(50)
                    .with_mutation_rate(0.1)
                    .with_seed(seed),
            );
            engine.run().expect("valid configuration");
            engine.best().expect("a generation completed").fitness()
        };

        assert_eq!(run(12345), run(12345));
    }

    #[test]
    fn test_clone_only_reproduction_path() {
        // Crossover rate 0 exercises the explicit-clone branch for every slot.
        let mut engine = Engine::new(
            EngineConfig::new(bit_population(20, 10, 3))
                .with_generations(20)
                .with_crossover_rate(0.0)
                .with_mutation_rate(0.5)
                .with_seed(9),
        );
        let report = engine.run().expect("valid configuration");
        assert_eq!(report.termination, Termination::Completed);
        assert!(engine.best().is_some());
    }

    #[test]
    fn test_empty_population_fails_and_best_stays_unset() {
        let mut engine = Engine::new(EngineConfig::new(Vec::<Scored>::new()));
        let err = engine.run().expect_err("empty population must be rejected");
        assert!(matches!(
            err,
            EngineError::InvalidConfig(ConfigError::EmptyPopulation)
        ));
        assert!(engine.best().is_none());
    }

    #[test]
    fn test_invalid_rate_fails_before_any_generation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 2.0]))
                .with_mutation_rate(1.5)
                .with_progress(move |_, _: &Scored| {
                    counter.fetch_add(1, AtomicOrdering::Relaxed);
                }),
        );
        assert!(engine.run().is_err());
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 0);
        assert!(engine.best().is_none());
    }

    #[test]
    fn test_progress_callback_sees_every_generation() {
        let generations = Arc::new(Mutex::new(Vec::new()));
        let sink = generations.clone();

        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 2.0, 3.0]))
                .with_generations(5)
                .with_seed(1)
                .with_progress(move |generation, _: &Scored| {
                    sink.lock().expect("no poisoned lock").push(generation);
                }),
        );
        engine.run().expect("valid configuration");

        assert_eq!(*generations.lock().expect("no poisoned lock"), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_convergence_stops_before_budget() {
        // Scored crossover can only average and elitism pins the best, so
        // improvement dries up immediately; mutation's +0.1 is drowned by
        // rate 0.0. The window must cut the run well short of the budget.
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 2.0, 3.0]))
                .with_generations(100)
                .with_mutation_rate(0.0)
                .with_convergence(3, 0.01)
                .with_seed(4)
                .with_progress(move |_, _: &Scored| {
                    counter.fetch_add(1, AtomicOrdering::Relaxed);
                }),
        );
        let report = engine.run().expect("valid configuration");

        assert_eq!(report.termination, Termination::Converged);
        assert!(report.generations_run < 100);
        assert!(
            calls.load(AtomicOrdering::Relaxed) < 100,
            "callback must fire fewer times than the generation budget"
        );
    }

    #[test]
    fn test_converged_callback_fires_once_more_at_the_stop_generation() {
        let generations = Arc::new(Mutex::new(Vec::new()));
        let sink = generations.clone();

        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[5.0, 5.0, 5.0]))
                .with_generations(50)
                .with_mutation_rate(0.0)
                .with_convergence(3, 0.0)
                .with_seed(8)
                .with_progress(move |generation, _: &Scored| {
                    sink.lock().expect("no poisoned lock").push(generation);
                }),
        );
        let report = engine.run().expect("valid configuration");
        assert_eq!(report.termination, Termination::Converged);

        let seen = generations.lock().expect("no poisoned lock").clone();
        // Baseline starts at 0.0 and the best never exceeds 5.0 + epsilon
        // more than once, so the counter fills within the first generations.
        let last = *seen.last().expect("callback fired");
        assert_eq!(last + 1, report.generations_run);
    }

    #[test]
    fn test_elitism_keeps_best_in_next_generation() {
        // Without mutation the elite's score can never be exceeded, so the
        // tracker must sit at the initial maximum for the whole run.
        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 9.0, 3.0]))
                .with_generations(30)
                .with_mutation_rate(0.0)
                .with_seed(6),
        );
        engine.run().expect("valid configuration");
        let best = engine.best().expect("a generation completed");
        assert!((best.fitness() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_disabled_elitism_still_tracks_best() {
        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 9.0, 3.0]))
                .with_generations(10)
                .with_elitism(false)
                .with_mutation_rate(0.0)
                .with_seed(6),
        );
        engine.run().expect("valid configuration");
        // The tracker holds the best across all generations even when the
        // population itself loses it.
        let best = engine.best().expect("a generation completed");
        assert!((best.fitness() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_engines_do_not_interfere() {
        let handles: Vec<_> = (0..8)
            .map(|seed| {
                std::thread::spawn(move || {
                    let mut engine = Engine::new(
                        EngineConfig::new(bit_population(20, 12, seed))
                            .with_generations(20)
                            .with_seed(seed),
                    );
                    engine.run().expect("valid configuration");
                    engine.best().expect("a generation completed").fitness()
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("engine thread panicked");
        }
    }

    #[test]
    fn test_contract_breaking_selector_is_an_error() {
        struct NoParents;
        impl<C: Chromosome> crate::selection::Selector<C> for NoParents {
            fn select(&self, _population: &[C], _rng: &RandomStream) -> Option<(usize, usize)> {
                None
            }
        }

        let mut engine = Engine::new(
            EngineConfig::new(scored_population(&[1.0, 2.0]))
                .with_generations(5)
                .with_selector(NoParents),
        );
        assert!(matches!(
            engine.run(),
            Err(EngineError::SelectionFailed)
        ));
    }
}
