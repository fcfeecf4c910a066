//! Circular seating optimization over pairwise familiarity scores.
//!
//! Given a guest list and a familiarity rating for every pair of guests,
//! finds a round-table arrangement whose neighbours are as familiar (or
//! as unfamiliar) as possible:
//!
//! - **Familiarity matrix** ([`matrix`]): symmetric pair scores, the
//!   read-only input of every search.
//! - **Simulated Annealing** ([`sa`]): the objective over circular
//!   arrangements, a single annealing run over seat swaps, and a
//!   best-of-K restart search.
//! - **Relation book** ([`relations`]): editable, JSON-persisted pair
//!   ratings that produce a matrix.
//! - **Layout** ([`layout`]): circle coordinates and SVG rendering of a
//!   finished seating.
//!
//! # Example
//!
//! ```
//! use u_seating::relations::RelationBook;
//! use u_seating::sa::{AnnealConfig, Direction, MultiRunConfig, MultiRunner};
//!
//! let mut book = RelationBook::new(
//!     ["Ann", "Bo", "Cy", "Di"].iter().map(|s| s.to_string()).collect(),
//! )
//! .unwrap();
//! book.set("Ann", "Bo", 5).unwrap();
//! book.set("Cy", "Di", 5).unwrap();
//! book.fill_missing(1).unwrap();
//!
//! let matrix = book.to_matrix().unwrap();
//! let result = MultiRunner::run(
//!     &matrix,
//!     &matrix.identity_arrangement(),
//!     &AnnealConfig::default().with_direction(Direction::Maximize),
//!     &MultiRunConfig::default().with_trials(100).with_seed(7),
//! )
//! .unwrap();
//! assert_eq!(result.best_score, 12.0);
//! ```

pub mod error;
pub mod layout;
pub mod matrix;
pub mod relations;
pub mod sa;

pub use error::{Result, SeatingError};
