//! Pairwise guest ratings and their JSON persistence.
//!
//! A [`RelationBook`] is the editable side of the familiarity data:
//! ratings are set one pair at a time, saved between sessions, and
//! turned into an immutable [`FamiliarityMatrix`] right before a search.
//!
//! # Ratings
//!
//! | score | meaning                  |
//! |-------|--------------------------|
//! | 1     | never met                |
//! | 2     | met once or twice        |
//! | 3     | solid acquaintances      |
//! | 4     | good mates               |
//! | 5     | deeply connected         |

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SeatingError};
use crate::matrix::FamiliarityMatrix;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Rating used to fill pairs nobody entered.
pub const DEFAULT_RATING: u8 = 5;

/// One rated pair as stored on disk. Order of `a` and `b` is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRating {
    pub a: String,
    pub b: String,
    pub score: i64,
}

#[derive(Serialize, Deserialize)]
struct BookFile {
    guests: Vec<String>,
    #[serde(default)]
    ratings: Vec<PairRating>,
}

/// Guest list plus a rating for (some of) the unordered guest pairs.
///
/// # Examples
///
/// ```
/// use u_seating::relations::RelationBook;
///
/// let mut book = RelationBook::new(vec!["Ann".into(), "Bo".into(), "Cy".into()]).unwrap();
/// book.set("Bo", "Ann", 4).unwrap();
/// assert_eq!(book.get("Ann", "Bo"), Some(4));
/// assert_eq!(book.missing_pairs().len(), 2);
///
/// book.fill_missing(5).unwrap();
/// let matrix = book.to_matrix().unwrap();
/// assert_eq!(matrix.score(0, 1), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationBook {
    guests: Vec<String>,
    ratings: BTreeMap<(String, String), u8>,
}

impl RelationBook {
    /// Creates a book with no ratings.
    pub fn new(guests: Vec<String>) -> Result<Self> {
        let mut book = Self::default();
        for guest in guests {
            book.add_guest(guest)?;
        }
        Ok(book)
    }

    pub fn guests(&self) -> &[String] {
        &self.guests
    }

    /// Number of rated pairs.
    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    /// Appends a guest. Existing ratings are untouched.
    pub fn add_guest(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SeatingError::DuplicateGuest(name));
        }
        self.guests.push(name);
        Ok(())
    }

    /// Removes a guest together with every rating that mentions them.
    pub fn remove_guest(&mut self, name: &str) -> Result<()> {
        let pos = self
            .guests
            .iter()
            .position(|g| g == name)
            .ok_or_else(|| SeatingError::UnknownGuest(name.to_string()))?;
        self.guests.remove(pos);
        self.ratings.retain(|(a, b), _| a != name && b != name);
        Ok(())
    }

    /// Sets the rating of an unordered pair, returning the previous one.
    pub fn set(&mut self, a: &str, b: &str, score: i64) -> Result<Option<u8>> {
        let key = self.key(a, b)?;
        let score = check_rating(a, b, score)?;
        Ok(self.ratings.insert(key, score))
    }

    /// Rating of an unordered pair, if one was entered.
    pub fn get(&self, a: &str, b: &str) -> Option<u8> {
        self.ratings.get(&canonical(a, b)).copied()
    }

    /// Unrated pairs of distinct guests, in guest-list order.
    pub fn missing_pairs(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (i, a) in self.guests.iter().enumerate() {
            for b in &self.guests[i + 1..] {
                if self.get(a, b).is_none() {
                    missing.push((a.clone(), b.clone()));
                }
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_pairs().is_empty()
    }

    /// Rates every unrated pair with `score`; returns how many were filled.
    pub fn fill_missing(&mut self, score: i64) -> Result<usize> {
        let missing = self.missing_pairs();
        for (a, b) in &missing {
            self.set(a, b, score)?;
        }
        Ok(missing.len())
    }

    /// All ratings, in guest-list order of the pairs.
    pub fn pairs(&self) -> Vec<PairRating> {
        let mut pairs = Vec::with_capacity(self.ratings.len());
        for (i, a) in self.guests.iter().enumerate() {
            for b in &self.guests[i + 1..] {
                if let Some(score) = self.get(a, b) {
                    pairs.push(PairRating {
                        a: a.clone(),
                        b: b.clone(),
                        score: i64::from(score),
                    });
                }
            }
        }
        pairs
    }

    /// Builds the optimizer input.
    ///
    /// Fails with [`SeatingError::MissingPair`] unless every pair is
    /// rated; call [`fill_missing`](Self::fill_missing) first to default
    /// them.
    pub fn to_matrix(&self) -> Result<FamiliarityMatrix> {
        let pairs = self
            .pairs()
            .into_iter()
            .map(|p| (p.a, p.b, p.score as f64));
        FamiliarityMatrix::from_pairs(self.guests.clone(), pairs)
    }

    /// Parses a book from its JSON form, validating every entry.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: BookFile = serde_json::from_str(json)?;
        let mut book = Self::new(file.guests)?;
        for rating in file.ratings {
            if book.get(&rating.a, &rating.b).is_some() {
                return Err(SeatingError::DuplicatePair {
                    a: rating.a,
                    b: rating.b,
                });
            }
            book.set(&rating.a, &rating.b, rating.score)?;
        }
        Ok(book)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_string(&self) -> Result<String> {
        let file = BookFile {
            guests: self.guests.clone(),
            ratings: self.pairs(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Loads a book from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let book = Self::from_json_str(&fs::read_to_string(path)?)?;
        debug!(
            path = %path.display(),
            guests = book.guests.len(),
            ratings = book.ratings.len(),
            "loaded relation book"
        );
        Ok(book)
    }

    /// Writes the book to a JSON file, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        debug!(path = %path.display(), ratings = self.ratings.len(), "saved relation book");
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.guests.iter().any(|g| g == name)
    }

    fn key(&self, a: &str, b: &str) -> Result<(String, String)> {
        for name in [a, b] {
            if !self.contains(name) {
                return Err(SeatingError::UnknownGuest(name.to_string()));
            }
        }
        if a == b {
            return Err(SeatingError::SelfPair(a.to_string()));
        }
        Ok(canonical(a, b))
    }
}

fn canonical(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn check_rating(a: &str, b: &str, score: i64) -> Result<u8> {
    if score < i64::from(MIN_RATING) || score > i64::from(MAX_RATING) {
        return Err(SeatingError::RatingOutOfRange {
            a: a.to_string(),
            b: b.to_string(),
            score,
        });
    }
    Ok(score as u8)
}
