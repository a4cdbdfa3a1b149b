//! # Rating Records
//!
//! In-memory representation of the ratings file: one [`RatingRecord`] per
//! input row, held in file order by a [`RatingDataset`] for the life of the run.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// Logical column names of the input file, in positional order.
pub const INPUT_COLUMNS: [&str; 4] = ["user_id", "product_id", "rating", "timestamp"];

/// Name of the derived flag column added once anomaly detection has run.
pub const FLAG_COLUMN: &str = "only_max_rating_user";

/// A numeric rating value.
///
/// Ratings are read as floating point (`5` and `5.0` are the same rating) but
/// need to key histograms and be compared for equality, so the value is kept
/// finite and ordered with `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct Rating(f64);

impl Rating {
    /// Wraps a rating value, rejecting NaN and infinities.
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // fold -0.0 into 0.0 so equality and hashing agree
        Some(Rating(if value == 0.0 { 0.0 } else { value }))
    }
}

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Rating {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One (user, product, rating, timestamp) row of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub user_id: String,
    pub product_id: String,
    pub rating: Rating,
    pub timestamp: DateTime<Utc>,
}

/// The loaded ratings, in file order.
///
/// Records never change after loading. The only mutation is the one-time
/// flag column written by `flag_users` (see the `export` module), which holds
/// one entry per record once set and is empty before.
#[derive(Debug, Clone, Default)]
pub struct RatingDataset {
    records: Vec<RatingRecord>,
    pub(crate) only_max_rating_user: Vec<bool>,
}

impl RatingDataset {
    pub fn new(records: Vec<RatingRecord>) -> Self {
        Self {
            records,
            only_max_rating_user: Vec::new(),
        }
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-record flag column; empty until users have been flagged.
    pub fn flags(&self) -> &[bool] {
        &self.only_max_rating_user
    }

    pub fn is_flagged(&self) -> bool {
        self.only_max_rating_user.len() == self.records.len() && !self.records.is_empty()
    }

    /// Column names as they currently stand, including the flag column once added.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut columns = INPUT_COLUMNS.to_vec();
        if self.is_flagged() {
            columns.push(FLAG_COLUMN);
        }
        columns
    }
}
