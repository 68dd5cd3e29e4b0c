//! Engine configuration.
//!
//! [`EngineConfig`] holds everything that controls a run: the initial
//! population, the generation budget, operator rates, elitism, the selection
//! strategy, convergence-based early stopping, an optional progress callback,
//! and the random seed. Defaults are applied once at construction; validation
//! happens once when the run starts, before any generation executes.

use crate::chromosome::Chromosome;
use crate::selection::{Selector, TournamentSelector};

/// Safety ceiling on population size.
///
/// Larger populations are rejected during validation as exceeding the
/// recommended maximum rather than silently truncated.
pub const MAX_POPULATION_SIZE: usize = 100_000;

/// Progress callback, invoked once per examined generation with the
/// generation index and the best chromosome found so far.
pub type ProgressFn<C> = Box<dyn FnMut(usize, &C) + Send>;

/// Convergence-based early-stopping policy.
///
/// The run stops once the best fitness fails to improve by more than
/// `epsilon` for `window` consecutive generations.
///
/// The improvement baseline starts at 0.0, so generation 0 is measured
/// against zero rather than against the initial population's best score, and
/// the baseline advances only when a generation improves on it. Populations
/// whose best score starts at or below `epsilon` (or negative) therefore
/// begin accumulating stall counts immediately; run one generation before
/// enabling the window if that matters for your fitness scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Convergence {
    /// Consecutive non-improving generations before stopping.
    pub window: usize,
    /// Minimum fitness improvement that counts as progress. Use 0.0 to
    /// accept any strict improvement.
    pub epsilon: f64,
}

/// A rejected configuration.
///
/// Every variant is detected before the first generation runs; none of them
/// is fatal to the host process.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population cannot be empty")]
    EmptyPopulation,
    #[error("generations must be at least 1")]
    ZeroGenerations,
    #[error("mutation rate must be within [0, 1], got {0}")]
    MutationRateOutOfRange(f64),
    #[error("crossover rate must be within [0, 1], got {0}")]
    CrossoverRateOutOfRange(f64),
    #[error("population size {0} exceeds the recommended maximum of {MAX_POPULATION_SIZE}")]
    PopulationTooLarge(usize),
}

/// Configuration for an [`Engine`](crate::Engine) run.
///
/// # Defaults
///
/// - generations: 100
/// - mutation rate: 0.01
/// - crossover rate: 0.8
/// - elitism: enabled
/// - selection: tournament, size 2
/// - seed: OS entropy (non-reproducible)
/// - convergence: disabled
/// - progress callback: none
///
/// # Builder pattern
///
/// ```ignore
/// let config = EngineConfig::new(population)
///     .with_generations(200)
///     .with_mutation_rate(0.02)
///     .with_seed(42);
/// let mut engine = Engine::new(config);
/// engine.run()?;
/// ```
pub struct EngineConfig<C: Chromosome> {
    pub(crate) population: Vec<C>,
    pub(crate) generations: usize,
    pub(crate) mutation_rate: f64,
    pub(crate) crossover_rate: f64,
    pub(crate) elitism: bool,
    pub(crate) selector: Box<dyn Selector<C>>,
    pub(crate) seed: Option<u64>,
    pub(crate) convergence: Option<Convergence>,
    pub(crate) progress: Option<ProgressFn<C>>,
}

impl<C: Chromosome> EngineConfig<C> {
    /// Creates a configuration around an initial population, with every
    /// other setting at its default.
    pub fn new(population: Vec<C>) -> Self {
        Self {
            population,
            generations: 100,
            mutation_rate: 0.01,
            crossover_rate: 0.8,
            elitism: true,
            selector: Box::new(TournamentSelector::default()),
            seed: None,
            convergence: None,
            progress: None,
        }
    }

    /// Sets the maximum number of generations to evolve. The run may stop
    /// earlier if convergence detection is enabled.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the probability of mutating each offspring. Typical values are
    /// 0.01–0.1. Out-of-range values are rejected by validation, not clamped.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the probability of recombining selected parents. When crossover
    /// does not fire, the offspring is a clone of the first parent. Typical
    /// values are 0.7–0.95.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Enables or disables elitism: seating the best-known chromosome
    /// unmodified into slot 0 of every new generation.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Replaces the default tournament selector with a custom strategy.
    pub fn with_selector(mut self, selector: impl Selector<C> + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Convenience for `.with_selector(TournamentSelector::new(size))`.
    pub fn with_tournament_size(self, size: usize) -> Self {
        self.with_selector(TournamentSelector::new(size))
    }

    /// Seeds the engine's random stream for reproducible runs. Without an
    /// explicit seed the stream is drawn from OS entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables early stopping once best fitness fails to improve by more
    /// than `epsilon` for `window` consecutive generations.
    pub fn with_convergence(mut self, window: usize, epsilon: f64) -> Self {
        self.convergence = Some(Convergence { window, epsilon });
        self
    }

    /// Registers a callback invoked once per examined generation with the
    /// generation index and the best chromosome found so far.
    pub fn with_progress(mut self, callback: impl FnMut(usize, &C) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Checks the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population.len() > MAX_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooLarge(self.population.len()));
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::CrossoverRateOutOfRange(self.crossover_rate));
        }
        Ok(())
    }
}

impl<C: Chromosome> std::fmt::Debug for EngineConfig<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("population_size", &self.population.len())
            .field("generations", &self.generations)
            .field("mutation_rate", &self.mutation_rate)
            .field("crossover_rate", &self.crossover_rate)
            .field("elitism", &self.elitism)
            .field("seed", &self.seed)
            .field("convergence", &self.convergence)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}
