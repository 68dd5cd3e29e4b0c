//! Generational genetic-algorithm engine.
//!
//! `evolver` evolves a population of candidate solutions over generations —
//! selection, crossover, mutation, elitist replacement — to maximize a scalar
//! fitness. It is an embeddable optimization primitive, not an application:
//! the engine knows nothing about the problem domain beyond the two pluggable
//! contracts.
//!
//! # Core traits
//!
//! - [`Chromosome`]: a candidate solution — fitness, crossover, mutation
//! - [`Selector`]: a parent-choosing strategy ([`TournamentSelector`] by
//!   default)
//!
//! # Key types
//!
//! - [`EngineConfig`]: run parameters with builder-style customization
//! - [`Engine`]: executes the generation loop; [`Engine::best`] exposes the
//!   best candidate found
//! - [`RunReport`]: how and when a run terminated
//! - [`RandomStream`]: the engine-owned, seedable random source every
//!   strategy draws from
//!
//! # Route optimization
//!
//! [`route`] ships a permutation chromosome over named 2-D waypoints with
//! order crossover (OX1) and swap mutation; [`loader`] reads waypoint tables
//! and [`visualize`] renders a tour as SVG.
//!
//! # Determinism and concurrency
//!
//! Each engine owns its random stream. Seeded engines replay identical
//! generation sequences; independent engines share no state and may run
//! concurrently on separate threads. The generation loop itself is
//! single-threaded and synchronous.
//!
//! ```ignore
//! use evolver::route::{Route, Waypoint};
//! use evolver::{Engine, EngineConfig, RandomStream};
//!
//! let waypoints = vec![
//!     Waypoint::new("depot", 0.0, 0.0),
//!     Waypoint::new("north", 0.0, 9.0),
//!     Waypoint::new("east", 7.0, 1.0),
//! ];
//! let rng = RandomStream::seeded(42);
//! let population: Vec<Route> =
//!     (0..100).map(|_| Route::shuffled(&waypoints, &rng)).collect();
//!
//! let mut engine = Engine::new(
//!     EngineConfig::new(population)
//!         .with_generations(200)
//!         .with_seed(42),
//! );
//! engine.run()?;
//! let best = engine.best().expect("a generation completed");
//! println!("shortest tour: {:.2}", best.total_distance());
//! ```

mod chromosome;
mod config;
mod engine;
mod random;
mod selection;

pub mod loader;
pub mod route;
pub mod visualize;

pub use chromosome::Chromosome;
pub use config::{ConfigError, Convergence, EngineConfig, ProgressFn, MAX_POPULATION_SIZE};
pub use engine::{Engine, EngineError, RunReport, Termination};
pub use random::RandomStream;
pub use selection::{Selector, TournamentSelector};
