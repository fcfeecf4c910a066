//! Total familiarity of a circular arrangement.

use crate::matrix::FamiliarityMatrix;

/// Sums the familiarity of every circularly adjacent pair.
///
/// Seat `N-1` neighbours seat `0`, so an arrangement of `N` guests
/// contributes exactly `N` terms. The arrangement must be a permutation
/// of the matrix indices; see [`FamiliarityMatrix::check_arrangement`].
///
/// # Examples
///
/// ```
/// use u_seating::matrix::FamiliarityMatrix;
/// use u_seating::sa::total_familiarity;
///
/// let guests: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
/// let m = FamiliarityMatrix::uniform(guests, 2.0).unwrap();
/// assert_eq!(total_familiarity(&m, &[3, 1, 0, 2]), 8.0);
/// ```
pub fn total_familiarity(matrix: &FamiliarityMatrix, arrangement: &[usize]) -> f64 {
    let n = arrangement.len();
    (0..n)
        .map(|i| matrix.score(arrangement[i], arrangement[(i + 1) % n]))
        .sum()
}

/// Change in [`total_familiarity`] if seats `i` and `j` traded guests.
///
/// Only the adjacency terms touching the two seats are re-summed (at
/// most four). The arrangement itself is not modified.
///
/// With whole-number scores (see
/// [`FamiliarityMatrix::has_integer_scores`]) the result equals the
/// difference of two full [`total_familiarity`] sums exactly. With
/// fractional scores it can differ from that difference by rounding,
/// including in sign when the true change is zero.
pub fn swap_delta(matrix: &FamiliarityMatrix, arrangement: &[usize], i: usize, j: usize) -> f64 {
    let n = arrangement.len();
    if i == j {
        return 0.0;
    }

    // Edge k joins seat k and seat k+1.
    let mut edges = [(i + n - 1) % n, i, (j + n - 1) % n, j];
    edges.sort_unstable();

    let swapped = |seat: usize| {
        if seat == i {
            arrangement[j]
        } else if seat == j {
            arrangement[i]
        } else {
            arrangement[seat]
        }
    };

    let mut delta = 0.0;
    for (idx, &k) in edges.iter().enumerate() {
        if idx > 0 && edges[idx - 1] == k {
            continue;
        }
        let next = (k + 1) % n;
        delta += matrix.score(swapped(k), swapped(next))
            - matrix.score(arrangement[k], arrangement[next]);
    }
    delta
}

/// `total_familiarity` after swapping seats `i` and `j` minus the total
/// before, bit-for-bit as two full sums would give it.
///
/// Uses [`swap_delta`] when that is exact and otherwise swaps, re-sums
/// and swaps back. `arrangement` is unchanged on return.
pub(crate) fn exact_swap_delta(
    matrix: &FamiliarityMatrix,
    arrangement: &mut [usize],
    i: usize,
    j: usize,
) -> f64 {
    if matrix.has_integer_scores() {
        return swap_delta(matrix, arrangement, i, j);
    }
    let before = total_familiarity(matrix, arrangement);
    arrangement.swap(i, j);
    let after = total_familiarity(matrix, arrangement);
    arrangement.swap(i, j);
    after - before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(n: usize) -> FamiliarityMatrix {
        let guests = (0..n).map(|i| format!("g{i}")).collect();
        FamiliarityMatrix::from_fn(guests, |i, j| ((i * 7 + j * 3) % 5 + 1) as f64).unwrap()
    }

    #[test]
    fn test_total_wraps_around() {
        let m = matrix(4);
        let a = [0, 1, 2, 3];
        let expected = m.score(0, 1) + m.score(1, 2) + m.score(2, 3) + m.score(3, 0);
        assert_eq!(total_familiarity(&m, &a), expected);
    }

    #[test]
    fn test_swap_delta_matches_recompute_all_pairs() {
        for n in 2..=7 {
            let m = matrix(n);
            let a: Vec<usize> = (0..n).rev().collect();
            let before = total_familiarity(&m, &a);
            for i in 0..n {
                for j in 0..n {
                    let mut b = a.clone();
                    b.swap(i, j);
                    let after = total_familiarity(&m, &b);
                    assert_eq!(
                        swap_delta(&m, &a, i, j),
                        after - before,
                        "n={n} i={i} j={j}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_two_guests_swap_is_free() {
        let m = matrix(2);
        assert_eq!(swap_delta(&m, &[0, 1], 0, 1), 0.0);
        assert_eq!(total_familiarity(&m, &[0, 1]), 2.0 * m.score(0, 1));
    }

    #[test]
    fn test_exact_delta_with_fractional_scores() {
        let guests = (0..7).map(|i| format!("g{i}")).collect();
        let fractions = [0.1, 0.2, 0.3, 0.7];
        let m = FamiliarityMatrix::from_fn(guests, |i, j| fractions[(i + 2 * j) % 4]).unwrap();
        assert!(!m.has_integer_scores());

        let mut arrangement: Vec<usize> = vec![3, 0, 6, 1, 5, 2, 4];
        let original = arrangement.clone();
        for i in 0..7 {
            for j in 0..7 {
                let before = total_familiarity(&m, &arrangement);
                let mut swapped = arrangement.clone();
                swapped.swap(i, j);
                let expected = total_familiarity(&m, &swapped) - before;
                let delta = exact_swap_delta(&m, &mut arrangement, i, j);
                assert_eq!(delta.to_bits(), expected.to_bits(), "swap ({i}, {j})");
                assert_eq!(arrangement, original);
            }
        }
    }
}
