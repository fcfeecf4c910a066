//! Error type shared by every layer of the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeatingError>;

/// Failures surfaced while building inputs, configuring a search, or
/// persisting relation data.
///
/// Numeric trouble inside the Metropolis step is not represented here:
/// it is absorbed by the annealer as a zero acceptance probability.
#[derive(Debug, Error)]
pub enum SeatingError {
    /// The guest list names the same guest twice.
    #[error("duplicate guest: {0}")]
    DuplicateGuest(String),

    /// A rating or lookup refers to a guest outside the guest list.
    #[error("unknown guest: {0}")]
    UnknownGuest(String),

    /// A rating pairs a guest with themselves.
    #[error("guest {0} cannot be rated against themselves")]
    SelfPair(String),

    /// The pair set given to the matrix does not cover this pair.
    #[error("missing familiarity score for pair ({a}, {b})")]
    MissingPair {
        /// First guest of the pair.
        a: String,
        /// Second guest of the pair.
        b: String,
    },

    /// The pair set scores the same unordered pair more than once.
    #[error("pair ({a}, {b}) is scored more than once")]
    DuplicatePair {
        /// First guest of the pair.
        a: String,
        /// Second guest of the pair.
        b: String,
    },

    /// A relation-book rating outside the accepted range.
    #[error("rating {score} for ({a}, {b}) is outside 1..=5")]
    RatingOutOfRange {
        /// First guest of the pair.
        a: String,
        /// Second guest of the pair.
        b: String,
        /// The offending rating.
        score: i64,
    },

    /// A matrix score that is negative or not finite.
    #[error("invalid familiarity score {score} for ({a}, {b})")]
    InvalidScore {
        /// First guest of the pair.
        a: String,
        /// Second guest of the pair.
        b: String,
        /// The offending score.
        score: f64,
    },

    /// Fewer than two guests; there is no circle to arrange.
    #[error("at least 2 guests are required, got {0}")]
    TooFewGuests(usize),

    /// An arrangement that is not a permutation of the guest indices.
    #[error("invalid arrangement: {0}")]
    InvalidArrangement(String),

    /// Schedule or search parameters that would do no useful work.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a relation file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A relation file could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
