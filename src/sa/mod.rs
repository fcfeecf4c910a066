//! Simulated Annealing (SA) over circular seatings.
//!
//! A single-solution trajectory metaheuristic: each run swaps pairs of
//! seats under a geometric cooling schedule, accepting worsening swaps
//! with a probability that shrinks as the temperature drops. Runs are
//! highly sensitive to the swap sequence, so [`MultiRunner`] restarts
//! from the same arrangement many times and keeps the best.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod multi;
mod objective;
mod runner;
mod types;

pub use config::{AnnealConfig, MultiRunConfig};
pub use multi::{trial_seed, MultiRunResult, MultiRunner};
pub use objective::{swap_delta, total_familiarity};
pub use runner::{AnnealOutcome, AnnealRunner};
pub use types::{Acceptance, Direction, Seating};
