use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_seating::matrix::FamiliarityMatrix;
use u_seating::sa::{
    swap_delta, total_familiarity, AnnealConfig, AnnealRunner, Direction, MultiRunConfig,
    MultiRunner,
};

fn guests(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("guest{i}")).collect()
}

/// A matrix with integer scores in 1..=5 plus a permutation of its guests.
fn matrix_and_arrangement() -> impl Strategy<Value = (FamiliarityMatrix, Vec<usize>)> {
    (2usize..16).prop_flat_map(|n| {
        let pairs = n * (n - 1) / 2;
        (
            prop::collection::vec(1u8..=5, pairs),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
            .prop_map(move |(scores, arrangement)| {
                let mut cells = Vec::with_capacity(n * n);
                cells.resize(n * n, 0.0);
                let mut k = 0;
                for i in 0..n {
                    for j in (i + 1)..n {
                        cells[i * n + j] = f64::from(scores[k]);
                        k += 1;
                    }
                }
                let m = FamiliarityMatrix::from_fn(guests(n), |i, j| cells[i * n + j]).unwrap();
                (m, arrangement)
            })
    })
}

proptest! {
    #[test]
    fn total_is_invariant_under_rotation((m, a) in matrix_and_arrangement(), shift in 0usize..16) {
        let mut rotated = a.clone();
        let len = rotated.len();
        rotated.rotate_left(shift % len);
        prop_assert_eq!(total_familiarity(&m, &a), total_familiarity(&m, &rotated));
    }

    #[test]
    fn total_is_invariant_under_reversal((m, a) in matrix_and_arrangement()) {
        let reversed: Vec<usize> = a.iter().rev().copied().collect();
        prop_assert_eq!(total_familiarity(&m, &a), total_familiarity(&m, &reversed));
    }

    #[test]
    fn total_is_sum_of_adjacent_lookups((m, a) in matrix_and_arrangement()) {
        let n = a.len();
        let mut expected = 0.0;
        for i in 0..n {
            expected += m.score(a[i], a[(i + 1) % n]);
        }
        prop_assert_eq!(total_familiarity(&m, &a), expected);
    }

    #[test]
    fn constant_matrix_scores_n_times_c(n in 2usize..20, c in 1u8..=5) {
        let m = FamiliarityMatrix::uniform(guests(n), f64::from(c)).unwrap();
        let a: Vec<usize> = (0..n).rev().collect();
        prop_assert_eq!(total_familiarity(&m, &a), n as f64 * f64::from(c));
    }

    #[test]
    fn swap_delta_matches_recompute((m, a) in matrix_and_arrangement(), i in 0usize..16, j in 0usize..16) {
        let n = a.len();
        let (i, j) = (i % n, j % n);
        let mut b = a.clone();
        b.swap(i, j);
        prop_assert_eq!(
            swap_delta(&m, &a, i, j),
            total_familiarity(&m, &b) - total_familiarity(&m, &a)
        );
    }

    #[test]
    fn annealer_preserves_guest_set((m, a) in matrix_and_arrangement(), seed in any::<u64>(), minimize in any::<bool>()) {
        let direction = if minimize { Direction::Minimize } else { Direction::Maximize };
        let config = AnnealConfig::default().with_direction(direction);
        let mut rng = StdRng::seed_from_u64(seed);
        let out = AnnealRunner::run(&m, &a, &config, &mut rng).unwrap();
        let mut sorted = out.arrangement.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..a.len()).collect::<Vec<_>>());
        prop_assert_eq!(out.score, total_familiarity(&m, &out.arrangement));
    }

    #[test]
    fn multi_run_never_worse_than_start((m, a) in matrix_and_arrangement(), seed in any::<u64>(), minimize in any::<bool>()) {
        let direction = if minimize { Direction::Minimize } else { Direction::Maximize };
        let anneal = AnnealConfig::default().with_direction(direction);
        let multi = MultiRunConfig::default().with_trials(5).with_seed(seed);
        let result = MultiRunner::run(&m, &a, &anneal, &multi).unwrap();
        prop_assert!(!direction.is_better(total_familiarity(&m, &a), result.best_score));
        prop_assert!(m.check_arrangement(&result.best).is_ok());
    }
}
