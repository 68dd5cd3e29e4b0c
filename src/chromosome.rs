//! The candidate-solution contract.
//!
//! [`Chromosome`] is the minimal capability set a problem representation must
//! implement to be evolved by the engine. The engine is otherwise unaware of
//! the problem domain: it only sorts by fitness, recombines, and perturbs.

use crate::random::RandomStream;

/// A candidate solution in the population.
///
/// Fitness follows the maximize convention: higher is always better. A
/// minimization problem should invert its metric (the bundled route
/// chromosome scores the reciprocal of tour distance, for example).
///
/// The `Clone` supertrait is part of the contract: the engine clones a parent
/// when crossover does not fire, and clones the best candidate into the elite
/// slot. Cloning must produce an independent value; distinct chromosomes
/// share no mutable state.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct BitString {
///     genes: Vec<bool>,
/// }
///
/// impl Chromosome for BitString {
///     fn fitness(&self) -> f64 {
///         self.genes.iter().filter(|&&g| g).count() as f64
///     }
///
///     fn crossover(&self, other: &Self, rng: &RandomStream) -> Self {
///         let point = rng.index(self.genes.len());
///         let mut genes = self.genes[..point].to_vec();
///         genes.extend_from_slice(&other.genes[point..]);
///         Self { genes }
///     }
///
///     fn mutate(&mut self, rng: &RandomStream) {
///         let i = rng.index(self.genes.len());
///         self.genes[i] = !self.genes[i];
///     }
/// }
/// ```
pub trait Chromosome: Clone + Send + 'static {
    /// Returns the quality of this solution. Higher values are better.
    fn fitness(&self) -> f64;

    /// Combines this chromosome with another into a new offspring.
    ///
    /// Must not mutate either operand, and must be total over any two values
    /// of the concrete type: on structurally incompatible inputs (e.g.
    /// mismatched lengths) return a copy of `self` rather than fail.
    ///
    /// All randomness must come from `rng`.
    fn crossover(&self, other: &Self, rng: &RandomStream) -> Self;

    /// Applies a small random change in place.
    ///
    /// All randomness must come from `rng`.
    fn mutate(&mut self, rng: &RandomStream);
}
