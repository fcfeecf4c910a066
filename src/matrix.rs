//! Symmetric pairwise familiarity scores.
//!
//! The matrix is the read-only input of the optimizer. It is built once
//! from a complete set of unordered pair scores and never mutated while
//! a search is running; editing happens on a [`RelationBook`] between
//! searches.
//!
//! [`RelationBook`]: crate::relations::RelationBook

use std::collections::HashMap;

use crate::error::{Result, SeatingError};

/// Largest score magnitude treated as exactly summable (2^40).
const MAX_EXACT_SCORE: f64 = 1_099_511_627_776.0;

/// Dense N×N familiarity table indexed by guest position.
///
/// Storage is row-major and symmetric. The diagonal is stored as zero
/// and never read by the objective.
///
/// # Examples
///
/// ```
/// use u_seating::matrix::FamiliarityMatrix;
///
/// let guests = vec!["A".to_string(), "B".to_string(), "C".to_string()];
/// let m = FamiliarityMatrix::from_pairs(
///     guests,
///     [("A", "B", 5.0), ("A", "C", 1.0), ("B", "C", 3.0)],
/// )
/// .unwrap();
/// assert_eq!(m.score(0, 1), 5.0);
/// assert_eq!(m.score(2, 1), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FamiliarityMatrix {
    guests: Vec<String>,
    scores: Vec<f64>,
    integral: bool,
}

impl FamiliarityMatrix {
    /// Builds a matrix from a guest list and one score per unordered pair.
    ///
    /// Every pair of distinct guests must appear exactly once, in either
    /// order. Missing pairs are an error; nothing is defaulted here.
    pub fn from_pairs<I, S>(guests: Vec<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let index = index_guests(&guests)?;
        let n = guests.len();
        let mut cells: Vec<Option<f64>> = vec![None; n * n];

        for (a, b, score) in pairs {
            let (a, b) = (a.as_ref(), b.as_ref());
            let i = *index
                .get(a)
                .ok_or_else(|| SeatingError::UnknownGuest(a.to_string()))?;
            let j = *index
                .get(b)
                .ok_or_else(|| SeatingError::UnknownGuest(b.to_string()))?;
            if i == j {
                return Err(SeatingError::SelfPair(a.to_string()));
            }
            check_score(a, b, score)?;
            if cells[i * n + j].is_some() {
                return Err(SeatingError::DuplicatePair {
                    a: a.to_string(),
                    b: b.to_string(),
                });
            }
            cells[i * n + j] = Some(score);
            cells[j * n + i] = Some(score);
        }

        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let score = cells[i * n + j].ok_or_else(|| SeatingError::MissingPair {
                    a: guests[i].clone(),
                    b: guests[j].clone(),
                })?;
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }

        Ok(Self::assemble(guests, scores))
    }

    /// Builds a matrix by evaluating `f(i, j)` for every `i < j`.
    pub fn from_fn<F>(guests: Vec<String>, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        index_guests(&guests)?;
        let n = guests.len();
        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let score = f(i, j);
                check_score(&guests[i], &guests[j], score)?;
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }
        Ok(Self::assemble(guests, scores))
    }

    fn assemble(guests: Vec<String>, scores: Vec<f64>) -> Self {
        let integral = scores
            .iter()
            .all(|s| s.fract() == 0.0 && s.abs() <= MAX_EXACT_SCORE);
        Self {
            guests,
            scores,
            integral,
        }
    }

    /// A matrix where every pair has the same score.
    pub fn uniform(guests: Vec<String>, score: f64) -> Result<Self> {
        Self::from_fn(guests, |_, _| score)
    }

    /// Number of guests.
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    /// Always `false`: construction rejects fewer than two guests.
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    pub fn guests(&self) -> &[String] {
        &self.guests
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.guests.iter().position(|g| g == name)
    }

    /// Familiarity between guests `i` and `j`.
    #[inline]
    pub fn score(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.guests.len() + j]
    }

    /// Whether every score is a whole number small enough that any sum
    /// of them is exact in `f64`.
    ///
    /// Incremental swap deltas are only sign-exact under this condition.
    pub fn has_integer_scores(&self) -> bool {
        self.integral
    }

    /// The arrangement `[0, 1, .., N-1]`, i.e. guest-list order.
    pub fn identity_arrangement(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    /// Verifies that `arrangement` is a permutation of `0..N`.
    pub fn check_arrangement(&self, arrangement: &[usize]) -> Result<()> {
        let n = self.len();
        if arrangement.len() != n {
            return Err(SeatingError::InvalidArrangement(format!(
                "expected {n} seats, got {}",
                arrangement.len()
            )));
        }
        let mut seen = vec![false; n];
        for &g in arrangement {
            if g >= n {
                return Err(SeatingError::InvalidArrangement(format!(
                    "guest index {g} out of range for {n} guests"
                )));
            }
            if seen[g] {
                return Err(SeatingError::InvalidArrangement(format!(
                    "guest {} seated twice",
                    self.guests[g]
                )));
            }
            seen[g] = true;
        }
        Ok(())
    }

    /// Translates guest names into an index arrangement.
    pub fn arrangement_from_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        let arrangement = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.index_of(name)
                    .ok_or_else(|| SeatingError::UnknownGuest(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.check_arrangement(&arrangement)?;
        Ok(arrangement)
    }

    /// Guest names in arrangement order.
    pub fn names_of(&self, arrangement: &[usize]) -> Vec<String> {
        arrangement.iter().map(|&g| self.guests[g].clone()).collect()
    }
}

fn index_guests(guests: &[String]) -> Result<HashMap<&str, usize>> {
    if guests.len() < 2 {
        return Err(SeatingError::TooFewGuests(guests.len()));
    }
    let mut index = HashMap::with_capacity(guests.len());
    for (i, name) in guests.iter().enumerate() {
        if index.insert(name.as_str(), i).is_some() {
            return Err(SeatingError::DuplicateGuest(name.clone()));
        }
    }
    Ok(index)
}

fn check_score(a: &str, b: &str, score: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 {
        return Err(SeatingError::InvalidScore {
            a: a.to_string(),
            b: b.to_string(),
            score,
        });
    }
    Ok(())
}
