//! Best-of-K restart search.
//!
//! [`MultiRunner`] repeats [`AnnealRunner`] from the same starting
//! arrangement and keeps the best result. Trials never chain: each one
//! starts from a private copy of the original start with its own RNG, so
//! they can run in any order, or in parallel, without changing the
//! outcome.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::config::{AnnealConfig, MultiRunConfig};
use super::objective::total_familiarity;
use super::runner::{AnnealOutcome, AnnealRunner};
use super::types::Seating;
use crate::error::Result;
use crate::matrix::FamiliarityMatrix;

/// Result of a multi-run search.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRunResult {
    /// Best arrangement seen, or the start if no trial beat it.
    pub best: Vec<usize>,

    /// Score of `best`.
    pub best_score: f64,

    /// Score of the unmodified start.
    pub start_score: f64,

    /// Index of the trial that produced `best`; `None` if it is the start.
    pub best_trial: Option<usize>,

    /// Final score of every completed trial, in trial order.
    pub trial_scores: Vec<f64>,

    /// Base seed the per-trial streams were derived from.
    pub seed: u64,

    /// Whether the search stopped early on the cancel flag.
    pub cancelled: bool,
}

impl MultiRunResult {
    /// Number of trials that ran to completion.
    pub fn trials(&self) -> usize {
        self.trial_scores.len()
    }

    /// The best arrangement with guest names attached.
    pub fn seating(&self, matrix: &FamiliarityMatrix) -> Seating {
        Seating::from_arrangement(matrix, &self.best, self.best_score)
    }
}

/// Executes the best-of-K annealing search.
///
/// # Usage
///
/// ```
/// use u_seating::matrix::FamiliarityMatrix;
/// use u_seating::sa::{AnnealConfig, MultiRunConfig, MultiRunner};
///
/// let guests: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
/// let m = FamiliarityMatrix::from_pairs(
///     guests,
///     [
///         ("A", "B", 5.0), ("A", "C", 1.0), ("A", "D", 1.0),
///         ("B", "C", 1.0), ("B", "D", 1.0), ("C", "D", 5.0),
///     ],
/// )
/// .unwrap();
/// let start = m.arrangement_from_names(&["A", "C", "B", "D"]).unwrap();
/// let result = MultiRunner::run(
///     &m,
///     &start,
///     &AnnealConfig::default(),
///     &MultiRunConfig::default().with_trials(50).with_seed(1),
/// )
/// .unwrap();
/// assert_eq!(result.best_score, 12.0);
/// ```
pub struct MultiRunner;

impl MultiRunner {
    /// Runs the multi-run search.
    pub fn run(
        matrix: &FamiliarityMatrix,
        start: &[usize],
        anneal: &AnnealConfig,
        multi: &MultiRunConfig,
    ) -> Result<MultiRunResult> {
        Self::run_with_cancel(matrix, start, anneal, multi, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before each trial on the serial path. Once
    /// it is set, the best result so far is returned with `cancelled`
    /// set. Parallel searches always run every trial.
    pub fn run_with_cancel(
        matrix: &FamiliarityMatrix,
        start: &[usize],
        anneal: &AnnealConfig,
        multi: &MultiRunConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MultiRunResult> {
        anneal.validate()?;
        multi.validate()?;
        matrix.check_arrangement(start)?;

        let seed = multi.seed.unwrap_or_else(rand::random);
        let start_score = total_familiarity(matrix, start);
        debug!(
            guests = matrix.len(),
            trials = multi.trials,
            seed,
            direction = %anneal.direction,
            start_score,
            "starting multi-run search"
        );

        let (outcomes, cancelled) = run_trials(matrix, start, anneal, multi, seed, cancel);

        // Serial reduction in trial order: strictly better replaces,
        // ties keep the incumbent.
        let mut best = start.to_vec();
        let mut best_score = start_score;
        let mut best_trial = None;
        let mut trial_scores = Vec::with_capacity(outcomes.len());

        for (trial, outcome) in outcomes.into_iter().enumerate() {
            trial_scores.push(outcome.score);
            if anneal.direction.is_better(outcome.score, best_score) {
                debug!(trial, score = outcome.score, previous = best_score, "new best");
                best = outcome.arrangement;
                best_score = outcome.score;
                best_trial = Some(trial);
            }
        }

        info!(
            trials = trial_scores.len(),
            best_score,
            start_score,
            cancelled,
            "multi-run search finished"
        );

        Ok(MultiRunResult {
            best,
            best_score,
            start_score,
            best_trial,
            trial_scores,
            seed,
            cancelled,
        })
    }
}

/// Runs every trial and returns outcomes in trial order.
fn run_trials(
    matrix: &FamiliarityMatrix,
    start: &[usize],
    anneal: &AnnealConfig,
    multi: &MultiRunConfig,
    seed: u64,
    cancel: Option<Arc<AtomicBool>>,
) -> (Vec<AnnealOutcome>, bool) {
    if multi.parallel {
        if let Some(outcomes) = run_trials_parallel(matrix, start, anneal, multi.trials, seed) {
            return (outcomes, false);
        }
    }

    let mut outcomes = Vec::with_capacity(multi.trials);
    for trial in 0..multi.trials {
        if let Some(ref flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return (outcomes, true);
            }
        }
        outcomes.push(run_trial(matrix, start, anneal, seed, trial));
    }
    (outcomes, false)
}

#[cfg(feature = "parallel")]
fn run_trials_parallel(
    matrix: &FamiliarityMatrix,
    start: &[usize],
    anneal: &AnnealConfig,
    trials: usize,
    seed: u64,
) -> Option<Vec<AnnealOutcome>> {
    use rayon::prelude::*;
    Some(
        (0..trials)
            .into_par_iter()
            .map(|trial| run_trial(matrix, start, anneal, seed, trial))
            .collect(),
    )
}

#[cfg(not(feature = "parallel"))]
fn run_trials_parallel(
    _matrix: &FamiliarityMatrix,
    _start: &[usize],
    _anneal: &AnnealConfig,
    _trials: usize,
    _seed: u64,
) -> Option<Vec<AnnealOutcome>> {
    tracing::warn!("`parallel` feature is disabled; running trials serially");
    None
}

fn run_trial(
    matrix: &FamiliarityMatrix,
    start: &[usize],
    anneal: &AnnealConfig,
    seed: u64,
    trial: usize,
) -> AnnealOutcome {
    let mut rng = StdRng::seed_from_u64(trial_seed(seed, trial));
    AnnealRunner::run_unchecked(matrix, start, anneal, &mut rng)
}

/// Seed of trial `trial` in a search with base seed `seed`
/// (SplitMix64 finalizer).
///
/// A one-trial search with base seed `s` behaves exactly like
/// [`AnnealRunner::run`] driven by `StdRng::seed_from_u64(trial_seed(s, 0))`.
pub fn trial_seed(seed: u64, trial: usize) -> u64 {
    let offset = (trial as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut z = seed.wrapping_add(offset);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::Direction;

    fn guests(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("g{i}")).collect()
    }

    fn pseudo_random_matrix(n: usize) -> FamiliarityMatrix {
        FamiliarityMatrix::from_fn(guests(n), |i, j| ((i * 31 + j * 17) % 5 + 1) as f64).unwrap()
    }

    #[test]
    fn test_never_worse_than_start() {
        let m = pseudo_random_matrix(10);
        let start = m.identity_arrangement();
        for direction in [Direction::Maximize, Direction::Minimize] {
            let anneal = AnnealConfig::default().with_direction(direction);
            let multi = MultiRunConfig::default().with_trials(20).with_seed(5);
            let result = MultiRunner::run(&m, &start, &anneal, &multi).unwrap();
            assert!(!direction.is_better(result.start_score, result.best_score));
            assert_eq!(result.best_score, total_familiarity(&m, &result.best));
            assert_eq!(result.trials(), 20);
        }
    }

    #[test]
    fn test_best_is_best_of_trials() {
        let m = pseudo_random_matrix(12);
        let start = m.identity_arrangement();
        let anneal = AnnealConfig::default();
        let multi = MultiRunConfig::default().with_trials(30).with_seed(11);
        let result = MultiRunner::run(&m, &start, &anneal, &multi).unwrap();
        let max_trial = result
            .trial_scores
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_score, max_trial.max(result.start_score));
        if let Some(trial) = result.best_trial {
            assert_eq!(result.trial_scores[trial], result.best_score);
            // First trial reaching the best wins ties.
            assert!(result.trial_scores[..trial]
                .iter()
                .all(|&s| s < result.best_score));
        }
    }

    #[test]
    fn test_single_trial_matches_single_run() {
        let m = pseudo_random_matrix(8);
        let start = m.identity_arrangement();
        let anneal = AnnealConfig::default();
        let multi = MultiRunConfig::default().with_trials(1).with_seed(99);
        let result = MultiRunner::run(&m, &start, &anneal, &multi).unwrap();

        let mut rng = StdRng::seed_from_u64(trial_seed(99, 0));
        let single = AnnealRunner::run(&m, &start, &anneal, &mut rng).unwrap();
        assert_eq!(result.trial_scores, vec![single.score]);
        if result.best_trial.is_some() {
            assert_eq!(result.best, single.arrangement);
        } else {
            assert_eq!(result.best, start);
        }
    }

    #[test]
    fn test_reports_seed_and_reproduces() {
        let m = pseudo_random_matrix(9);
        let start = m.identity_arrangement();
        let anneal = AnnealConfig::default();
        let first = MultiRunner::run(&m, &start, &anneal, &MultiRunConfig::default().with_trials(10))
            .unwrap();
        let again = MultiRunner::run(
            &m,
            &start,
            &anneal,
            &MultiRunConfig::default().with_trials(10).with_seed(first.seed),
        )
        .unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_cancellation() {
        let m = pseudo_random_matrix(6);
        let start = m.identity_arrangement();
        // Set before running so the outcome does not depend on timing.
        let cancel = Arc::new(AtomicBool::new(true));
        let result = MultiRunner::run_with_cancel(
            &m,
            &start,
            &AnnealConfig::default(),
            &MultiRunConfig::default().with_trials(100).with_seed(1),
            Some(cancel),
        )
        .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.trials(), 0);
        assert_eq!(result.best, start);
        assert_eq!(result.best_trial, None);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let m = pseudo_random_matrix(5);
        let start = m.identity_arrangement();
        let multi = MultiRunConfig::default().with_trials(0);
        assert!(MultiRunner::run(&m, &start, &AnnealConfig::default(), &multi).is_err());
    }

    #[test]
    fn test_trial_seeds_differ() {
        let seeds: Vec<u64> = (0..100).map(|t| trial_seed(42, t)).collect();
        let mut dedup = seeds.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), seeds.len());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let m = pseudo_random_matrix(11);
        let start = m.identity_arrangement();
        let anneal = AnnealConfig::default();
        let serial = MultiRunConfig::default().with_trials(40).with_seed(3);
        let parallel = serial.clone().with_parallel(true);
        assert_eq!(
            MultiRunner::run(&m, &start, &anneal, &serial).unwrap(),
            MultiRunner::run(&m, &start, &anneal, &parallel).unwrap()
        );
    }
}
