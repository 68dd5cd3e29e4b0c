//! Demo command for the evolver engine.
//!
//! Two worked examples: a one-max bitstring and a shortest-route search over
//! waypoints loaded from a `(name, x, y)` table, with the winning tour
//! rendered as SVG.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use evolver::route::{Route, Waypoint};
use evolver::{loader, visualize, Chromosome, Engine, EngineConfig, RandomStream};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "evolver", version, about = "Evolutionary optimization demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a bitstring toward all ones
    Onemax {
        /// Bits per chromosome
        #[arg(long, default_value_t = 20)]
        bits: usize,

        /// Population size
        #[arg(long, default_value_t = 100)]
        population: usize,

        /// Generation budget
        #[arg(long, default_value_t = 100)]
        generations: usize,

        /// Random seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evolve the shortest closed tour over waypoints from a file
    Route {
        /// Waypoint table: header row, then name,x,y rows
        file: PathBuf,

        /// Where to write the SVG of the best tour
        #[arg(short, long, default_value = "route.svg")]
        output: PathBuf,

        /// Population size
        #[arg(long, default_value_t = 100)]
        population: usize,

        /// Generation budget
        #[arg(long, default_value_t = 200)]
        generations: usize,

        /// Random seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// One-max: fitness is the number of set bits.
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

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Onemax {
            bits,
            population,
            generations,
            seed,
        } => run_onemax(bits, population, generations, seed),
        Commands::Route {
            file,
            output,
            population,
            generations,
            seed,
        } => run_route(&file, &output, population, generations, seed),
    }
}

fn seed_stream(seed: Option<u64>) -> RandomStream {
    match seed {
        Some(seed) => RandomStream::seeded(seed),
        None => RandomStream::from_entropy(),
    }
}

fn run_onemax(
    bits: usize,
    population_size: usize,
    generations: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let rng = seed_stream(seed);
    let population: Vec<BitString> = (0..population_size)
        .map(|_| BitString::random(bits, &rng))
        .collect();

    let mut config = EngineConfig::new(population)
        .with_generations(generations)
        .with_mutation_rate(0.01)
        .with_crossover_rate(0.8);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut engine = Engine::new(config);
    let report = engine.run().context("one-max run failed")?;
    info!(?report.termination, report.generations_run, "run finished");

    let best = match engine.best() {
        Some(best) => best,
        None => bail!("no generation completed"),
    };
    println!("Best chromosome fitness: {} / {bits}", best.fitness());
    Ok(())
}

fn run_route(
    file: &PathBuf,
    output: &PathBuf,
    population_size: usize,
    generations: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let waypoints = loader::load_waypoints(file)
        .with_context(|| format!("failed to load waypoints from {}", file.display()))?;
    if waypoints.len() < 2 {
        bail!(
            "need at least 2 waypoints for a route, got {}",
            waypoints.len()
        );
    }
    println!("Loaded {} waypoints", waypoints.len());

    let rng = seed_stream(seed);
    let population: Vec<Route> = (0..population_size)
        .map(|_| Route::shuffled(&waypoints, &rng))
        .collect();

    let mut config = EngineConfig::new(population)
        .with_generations(generations)
        .with_mutation_rate(0.02)
        .with_crossover_rate(0.85)
        .with_progress(move |generation, best: &Route| {
            if generation % 20 == 0 || generation + 1 == generations {
                println!(
                    "Generation {generation}: best distance = {:.2}",
                    best.total_distance()
                );
            }
        });
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut engine = Engine::new(config);
    let report = engine.run().context("route run failed")?;
    info!(?report.termination, report.generations_run, "run finished");

    let best = match engine.best() {
        Some(best) => best,
        None => bail!("no generation completed"),
    };
    println!(
        "Best route fitness: {:.6} (total distance: {:.2})",
        best.fitness(),
        best.total_distance()
    );

    visualize::render_route_svg(best.waypoints(), output)
        .with_context(|| format!("failed to render {}", output.display()))?;
    println!("Route visualization saved to {}", output.display());
    Ok(())
}
