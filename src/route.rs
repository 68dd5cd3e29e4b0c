//! Permutation chromosome for route optimization.
//!
//! A [`Route`] is an ordered sequence of named 2-D [`Waypoint`]s evaluated as
//! a closed tour. It instantiates the [`Chromosome`] contract with the two
//! permutation-preserving operators:
//!
//! - order crossover (OX1, Davis 1985): copies a segment from one parent and
//!   fills the remaining slots in the other parent's order
//! - swap mutation: exchanges two distinct positions
//!
//! Both keep the invariant that every waypoint appears exactly once.

use crate::chromosome::Chromosome;
use crate::random::RandomStream;
use std::collections::HashSet;

/// A named point on the plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Euclidean distance to another waypoint.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Total length of the closed tour visiting `waypoints` in order.
///
/// Fewer than two waypoints make no tour (0.0). A two-stop tour traverses
/// its single edge once; longer tours close back to the first waypoint.
pub fn closed_tour_distance(waypoints: &[Waypoint]) -> f64 {
    match waypoints.len() {
        0 | 1 => 0.0,
        2 => waypoints[0].distance_to(&waypoints[1]),
        n => (0..n)
            .map(|i| waypoints[i].distance_to(&waypoints[(i + 1) % n]))
            .sum(),
    }
}

/// An ordered tour over a fixed set of waypoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Builds a route visiting `waypoints` in a random order. Convenience
    /// for seeding an initial population.
    pub fn shuffled(waypoints: &[Waypoint], rng: &RandomStream) -> Self {
        let mut waypoints = waypoints.to_vec();
        rng.with(|r| {
            use rand::seq::SliceRandom;
            waypoints.shuffle(r);
        });
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Total length of this route as a closed tour.
    pub fn total_distance(&self) -> f64 {
        closed_tour_distance(&self.waypoints)
    }
}

impl Chromosome for Route {
    /// Reciprocal of the closed-tour distance, so shorter tours score
    /// higher. A route with fewer than two waypoints scores 0; a degenerate
    /// tour of coincident waypoints scores positive infinity.
    fn fitness(&self) -> f64 {
        if self.waypoints.len() < 2 {
            return 0.0;
        }
        let total = self.total_distance();
        if total == 0.0 {
            f64::INFINITY
        } else {
            total.recip()
        }
    }

    /// Order crossover (OX1).
    ///
    /// Copies the closed segment `[start, end]` from `self`, then walks
    /// `other` starting just past `end` (wrapping), appending each waypoint
    /// not already used into the remaining slots in order, also wrapping.
    /// Waypoints are keyed by name, not by floating-point coordinates, so
    /// coordinate precision can never duplicate or drop a stop.
    ///
    /// Parents of mismatched lengths, or shorter than two stops, fall back
    /// to a copy of `self`.
    fn crossover(&self, other: &Self, rng: &RandomStream) -> Self {
        let n = self.waypoints.len();
        if n != other.waypoints.len() || n < 2 {
            return self.clone();
        }

        let (start, end) = rng.with(|r| {
            use rand::Rng;
            let a = r.random_range(0..n);
            let b = r.random_range(0..n);
            (a.min(b), a.max(b))
        });

        let used: HashSet<&str> = self.waypoints[start..=end]
            .iter()
            .map(|w| w.name.as_str())
            .collect();

        // Seed the child with self so every slot holds a valid waypoint even
        // if the parents do not share a waypoint set; matching sets always
        // overwrite every slot outside the segment.
        let mut child = self.waypoints.clone();
        let mut slot = (end + 1) % n;
        for offset in 0..n {
            let candidate = &other.waypoints[(end + 1 + offset) % n];
            if !used.contains(candidate.name.as_str()) {
                child[slot] = candidate.clone();
                slot = (slot + 1) % n;
                if slot == start {
                    break;
                }
            }
        }

        Self { waypoints: child }
    }

    /// Swaps two distinct positions. No-op for routes shorter than two.
    fn mutate(&mut self, rng: &RandomStream) {
        let n = self.waypoints.len();
        if n < 2 {
            return;
        }
        rng.with(|r| {
            use rand::Rng;
            let i = r.random_range(0..n);
            let mut j = r.random_range(0..n);
            while j == i {
                j = r.random_range(0..n);
            }
            self.waypoints.swap(i, j);
        });
    }
}
