//! QA summary block printed at the end of a run.

use std::collections::HashSet;
use std::fmt;

use crate::record::{Rating, RatingDataset, RatingRecord};

const SUMMARY_HEADER: &str = "===== QA SUMMARY REPORT =====";

/// Aggregate counts for the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct QaSummary {
    pub total_reviews: usize,
    pub unique_users: usize,
    pub target_rating: Option<Rating>,
    /// Share of reviews at the target rating, 0..=100.
    pub target_rating_percentage: f64,
    pub suspicious_users: usize,
    pub duplicate_entries: usize,
    /// Records carrying the suspicious-user flag (0 before flagging).
    pub flagged_records: usize,
}

impl QaSummary {
    pub fn compute(
        dataset: &RatingDataset,
        target_rating: Option<Rating>,
        suspicious_users: usize,
        duplicate_entries: usize,
    ) -> Self {
        let records = dataset.records();

        Self {
            total_reviews: records.len(),
            unique_users: count_unique_users(records),
            target_rating,
            target_rating_percentage: rating_percentage(records, target_rating),
            suspicious_users,
            duplicate_entries,
            flagged_records: dataset.flags().iter().filter(|&&flag| flag).count(),
        }
    }

    fn rating_label(&self) -> String {
        match self.target_rating {
            Some(rating) => format!("{}-rating", rating),
            None => "max-rating".to_string(),
        }
    }
}

impl fmt::Display for QaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.rating_label();

        writeln!(f, "{}", SUMMARY_HEADER)?;
        writeln!(f, "Total reviews: {}", self.total_reviews)?;
        writeln!(f, "Unique users: {}", self.unique_users)?;
        writeln!(f, "% of {} reviews: {:.2}%", label, self.target_rating_percentage)?;
        writeln!(f, "Users who only gave {} reviews: {}", label, self.suspicious_users)?;
        writeln!(f, "Reviews from those users: {}", self.flagged_records)?;
        writeln!(f, "Duplicate (user, product) entries: {}", self.duplicate_entries)?;
        write!(f, "{}", "=".repeat(SUMMARY_HEADER.len()))
    }
}

pub fn count_unique_users(records: &[RatingRecord]) -> usize {
    records
        .iter()
        .map(|record| record.user_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Percentage of records whose rating equals `target`.
///
/// Zero when there are no records, no target, or no record at the target.
pub fn rating_percentage(records: &[RatingRecord], target: Option<Rating>) -> f64 {
    let Some(target) = target else {
        return 0.0;
    };
    if records.is_empty() {
        return 0.0;
    }

    let at_target = records.iter().filter(|record| record.rating == target).count();
    (at_target as f64 / records.len() as f64) * 100.0
}
