//! Parent-selection strategies.
//!
//! Selection determines which chromosomes reproduce. The [`Selector`] trait
//! keeps the strategy pluggable; [`TournamentSelector`] is the default.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::chromosome::Chromosome;
use crate::random::RandomStream;

/// A parent-choosing strategy.
///
/// Implementations must be stateless beyond their own tunable parameters and
/// must draw all randomness from the supplied stream, never from an ambient
/// source. This keeps selection reproducible under an explicit seed and free
/// of data races when multiple engines run concurrently.
pub trait Selector<C: Chromosome>: Send {
    /// Chooses two parent indices from `population`.
    ///
    /// Returns `None` exactly when the population is empty (degenerate
    /// no-op). The two indices may coincide.
    fn select(&self, population: &[C], rng: &RandomStream) -> Option<(usize, usize)>;
}

/// Tournament selection: sample `size` chromosomes at random (with
/// replacement) and keep the fittest; repeat for the second parent.
///
/// Tournament size balances selection pressure with diversity:
/// - size 2: light pressure, preserves diversity (the default)
/// - size 3–5: moderate pressure
/// - larger: strong pressure, risks premature convergence
///
/// A configured size of 0 falls back to 2; a size larger than the population
/// is clamped to the population size. Ties keep the first-drawn competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelector {
    /// Number of chromosomes competing in each tournament.
    pub size: usize,
}

impl TournamentSelector {
    /// Creates a selector with the given tournament size.
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self { size: 2 }
    }
}

impl<C: Chromosome> Selector<C> for TournamentSelector {
    fn select(&self, population: &[C], rng: &RandomStream) -> Option<(usize, usize)> {
        if population.is_empty() {
            return None;
        }

        let size = if self.size == 0 { 2 } else { self.size };
        let size = size.min(population.len());

        let run_tournament = || {
            let mut winner = rng.index(population.len());
            for _ in 1..size {
                let challenger = rng.index(population.len());
                if population[challenger].fitness() > population[winner].fitness() {
                    winner = challenger;
                }
            }
            winner
        };

        let first = run_tournament();
        let second = run_tournament();
        Some((first, second))
    }
}
