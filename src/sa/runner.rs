//! Single-run annealing loop.

use rand::seq::index::sample;
use rand::Rng;

use super::config::AnnealConfig;
use super::objective::{exact_swap_delta, total_familiarity};
use super::types::Acceptance;
use crate::error::Result;
use crate::matrix::FamiliarityMatrix;

/// Result of one annealing run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealOutcome {
    /// The arrangement the run ended on (not necessarily the best visited).
    pub arrangement: Vec<usize>,

    /// Total familiarity of `arrangement`, recomputed after the run.
    pub score: f64,

    /// Number of swap proposals (one per temperature step).
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,
}

/// Executes one Simulated Annealing run over seat swaps.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Anneals `start` under `config`, drawing all randomness from `rng`.
    ///
    /// Each temperature step proposes swapping two distinct seats chosen
    /// uniformly at random. Improving swaps are always taken. Others are
    /// taken when a uniform draw `u` in `[0, 1)` satisfies `u < p`, where
    /// under the default [`Acceptance::Signed`] rule `p = exp(-delta / T)`
    /// and `delta = candidate - current`, whatever the direction. A
    /// non-finite `p` counts as 0.
    ///
    /// When maximizing, a worsening swap therefore has `p >= 1` and is
    /// accepted unless `-delta / T` overflows, which happens only once
    /// the temperature is very low. [`Acceptance::Mirrored`] instead
    /// penalizes worsening symmetrically in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidConfig`] for a bad schedule and
    /// [`SeatingError::InvalidArrangement`] if `start` is not a
    /// permutation of the matrix indices.
    ///
    /// [`SeatingError::InvalidConfig`]: crate::error::SeatingError::InvalidConfig
    /// [`SeatingError::InvalidArrangement`]: crate::error::SeatingError::InvalidArrangement
    pub fn run<R: Rng>(
        matrix: &FamiliarityMatrix,
        start: &[usize],
        config: &AnnealConfig,
        rng: &mut R,
    ) -> Result<AnnealOutcome> {
        config.validate()?;
        matrix.check_arrangement(start)?;
        Ok(Self::run_unchecked(matrix, start, config, rng))
    }

    /// The loop proper. Inputs must already be validated.
    pub(crate) fn run_unchecked<R: Rng>(
        matrix: &FamiliarityMatrix,
        start: &[usize],
        config: &AnnealConfig,
        rng: &mut R,
    ) -> AnnealOutcome {
        let mut arrangement = start.to_vec();
        let n = arrangement.len();
        let direction = config.direction;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        while temperature > config.min_temperature {
            let seats = sample(rng, n, 2);
            let (i, j) = (seats.index(0), seats.index(1));
            let delta = exact_swap_delta(matrix, &mut arrangement, i, j);

            // Metropolis acceptance criterion
            let accept = if direction.improves(delta) {
                improving_moves += 1;
                true
            } else {
                let cost = match config.acceptance {
                    Acceptance::Signed => delta,
                    Acceptance::Mirrored => direction.worsening(delta),
                };
                let probability = acceptance_probability(cost, temperature);
                rng.random_range(0.0..1.0) < probability
            };

            if accept {
                arrangement.swap(i, j);
                accepted_moves += 1;
            }

            iterations += 1;
            temperature *= config.alpha;
        }

        let score = total_familiarity(matrix, &arrangement);
        AnnealOutcome {
            arrangement,
            score,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
        }
    }
}

/// `exp(-cost / temperature)`, or 0 when the exponent or the result
/// is not a finite number.
fn acceptance_probability(cost: f64, temperature: f64) -> f64 {
    let exponent = -cost / temperature;
    if !exponent.is_finite() {
        return 0.0;
    }
    let probability = exponent.exp();
    if probability.is_finite() {
        probability
    } else {
        0.0
    }
}
