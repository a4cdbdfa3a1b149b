//! # Anomaly Detection
//!
//! Two independent checks over the loaded records:
//!
//! 1. Users whose every rating equals the target rating (by default the
//!    maximum rating observed in the dataset).
//! 2. Duplicate (user_id, product_id) pairs, scanned in file order.
//!
//! Both are pure functions of the record slice and are recomputed from the
//! full dataset on every run.

use std::collections::{BTreeMap, HashSet};

use tracing::info;

use crate::record::{Rating, RatingRecord};

/// Results of both anomaly checks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    /// Rating a user must give on every record to be suspicious.
    pub target_rating: Option<Rating>,
    /// Unique suspicious user ids, ascending by user id.
    pub suspicious_users: Vec<String>,
    /// One flag per record; true for every repeat of an earlier pair.
    pub duplicate_flags: Vec<bool>,
}

impl AnomalyReport {
    pub fn duplicate_count(&self) -> usize {
        count_duplicates(&self.duplicate_flags)
    }
}

/// Runs both checks against `records`.
///
/// With no target (an empty dataset and no pinned rating) the suspicious
/// set is empty.
pub fn detect_anomalies(records: &[RatingRecord], target_rating: Option<Rating>) -> AnomalyReport {
    let suspicious_users = match target_rating {
        Some(target) => find_max_rating_only_users(records, target),
        None => Vec::new(),
    };
    let duplicate_flags = find_duplicate_pairs(records);

    let report = AnomalyReport {
        target_rating,
        suspicious_users,
        duplicate_flags,
    };

    info!(
        suspicious_users = report.suspicious_users.len(),
        duplicates = report.duplicate_count(),
        "anomaly detection finished"
    );
    report
}

/// Highest rating in the dataset, `None` when there are no records.
pub fn max_rating(records: &[RatingRecord]) -> Option<Rating> {
    records.iter().map(|record| record.rating).max()
}

/// A pinned rating wins; otherwise the maximum observed rating is used.
pub fn resolve_target_rating(pinned: Option<Rating>, records: &[RatingRecord]) -> Option<Rating> {
    pinned.or_else(|| max_rating(records))
}

/// Finds users all of whose ratings equal `target`.
///
/// Records are grouped by user id; a user qualifies iff the predicate holds
/// for every one of their records, so a user with a single matching record
/// qualifies trivially.
///
/// # Arguments
///
/// * `records` - The loaded ratings, any order
/// * `target` - The rating every record of a suspicious user must carry
///
/// # Returns
///
/// * `Vec<String>` - Unique user ids in grouping order (ascending)
pub fn find_max_rating_only_users(records: &[RatingRecord], target: Rating) -> Vec<String> {
    // user id -> "every rating seen so far equals target"
    let mut all_at_target: BTreeMap<&str, bool> = BTreeMap::new();

    for record in records {
        let matches = all_at_target.entry(record.user_id.as_str()).or_insert(true);
        *matches &= record.rating == target;
    }

    all_at_target
        .into_iter()
        .filter(|&(_, matches)| matches)
        .map(|(user_id, _)| user_id.to_string())
        .collect()
}

/// Marks each record that repeats an earlier (user_id, product_id) pair.
///
/// The first occurrence of a pair is never marked; every later occurrence is.
pub fn find_duplicate_pairs(records: &[RatingRecord]) -> Vec<bool> {
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(records.len());

    records
        .iter()
        .map(|record| !seen.insert((record.user_id.as_str(), record.product_id.as_str())))
        .collect()
}

pub fn count_duplicates(flags: &[bool]) -> usize {
    flags.iter().filter(|&&is_duplicate| is_duplicate).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::{rating, record};
    use std::collections::{BTreeSet, HashMap};

    fn scenario() -> Vec<RatingRecord> {
        vec![
            record("u1", "p1", 5.0, 1),
            record("u1", "p2", 5.0, 2),
            record("u2", "p1", 3.0, 3),
            record("u2", "p1", 4.0, 4),
        ]
    }

    #[test]
    fn test_scenario_suspicious_and_duplicates() {
        let records = scenario();
        let report = detect_anomalies(&records, max_rating(&records));

        assert_eq!(report.target_rating, Some(rating(5.0)));
        assert_eq!(report.suspicious_users, vec!["u1".to_string()]);
        assert_eq!(report.duplicate_flags, vec![false, false, false, true]);
        assert_eq!(report.duplicate_count(), 1);
    }

    #[test]
    fn test_single_row_user_is_trivially_suspicious() {
        let records = vec![record("u1", "p1", 5.0, 1)];
        let report = detect_anomalies(&records, max_rating(&records));

        assert_eq!(report.suspicious_users, vec!["u1".to_string()]);
        assert_eq!(report.duplicate_count(), 0);
    }

    #[test]
    fn test_empty_dataset_has_no_target_and_no_anomalies() {
        let report = detect_anomalies(&[], max_rating(&[]));

        assert_eq!(report.target_rating, None);
        assert!(report.suspicious_users.is_empty());
        assert!(report.duplicate_flags.is_empty());
    }

    #[test]
    fn test_one_lower_rating_disqualifies_user() {
        let records = vec![
            record("u1", "p1", 5.0, 1),
            record("u1", "p2", 4.0, 2),
            record("u1", "p3", 5.0, 3),
        ];
        assert!(find_max_rating_only_users(&records, rating(5.0)).is_empty());
    }

    #[test]
    fn test_target_follows_observed_maximum() {
        // nobody rated 5, so 4 is the maximum and u2 qualifies
        let records = vec![
            record("u1", "p1", 3.0, 1),
            record("u2", "p1", 4.0, 2),
            record("u2", "p2", 4.0, 3),
        ];
        let target = resolve_target_rating(None, &records);
        assert_eq!(target, Some(rating(4.0)));
        assert_eq!(find_max_rating_only_users(&records, rating(4.0)), vec!["u2".to_string()]);
    }

    #[test]
    fn test_pinned_target_overrides_observed_maximum() {
        let records = vec![record("u1", "p1", 4.0, 1)];
        let target = resolve_target_rating(Some(rating(5.0)), &records);
        assert_eq!(target, Some(rating(5.0)));
        assert!(detect_anomalies(&records, target).suspicious_users.is_empty());
    }

    #[test]
    fn test_suspicious_users_are_unique_and_sorted() {
        let records = vec![
            record("zed", "p1", 5.0, 1),
            record("amy", "p1", 5.0, 2),
            record("zed", "p2", 5.0, 3),
            record("amy", "p3", 5.0, 4),
        ];
        assert_eq!(
            find_max_rating_only_users(&records, rating(5.0)),
            vec!["amy".to_string(), "zed".to_string()]
        );
    }

    #[test]
    fn test_suspicious_iff_distinct_ratings_equal_target() {
        let records = vec![
            record("a", "p1", 5.0, 1),
            record("a", "p2", 5.0, 2),
            record("b", "p1", 1.0, 3),
            record("b", "p2", 5.0, 4),
            record("c", "p1", 2.0, 5),
            record("d", "p9", 5.0, 6),
        ];
        let target = rating(5.0);

        let mut distinct: HashMap<&str, BTreeSet<Rating>> = HashMap::new();
        for r in &records {
            distinct.entry(r.user_id.as_str()).or_default().insert(r.rating);
        }
        let expected: Vec<String> = {
            let mut users: Vec<String> = distinct
                .iter()
                .filter(|(_, ratings)| ratings.len() == 1 && ratings.contains(&target))
                .map(|(user, _)| user.to_string())
                .collect();
            users.sort();
            users
        };

        assert_eq!(find_max_rating_only_users(&records, target), expected);
    }

    #[test]
    fn test_duplicate_flags_mark_only_later_occurrences() {
        let records = vec![
            record("u1", "p1", 5.0, 1),
            record("u1", "p1", 4.0, 2),
            record("u2", "p1", 3.0, 3),
            record("u1", "p1", 2.0, 4),
            record("u1", "p2", 5.0, 5),
        ];
        let flags = find_duplicate_pairs(&records);
        assert_eq!(flags, vec![false, true, false, true, false]);

        let unique_pairs: HashSet<(&str, &str)> = records
            .iter()
            .map(|r| (r.user_id.as_str(), r.product_id.as_str()))
            .collect();
        assert_eq!(count_duplicates(&flags), records.len() - unique_pairs.len());
    }

    #[test]
    fn test_pair_matching_is_exact() {
        // same ids swapped between columns are not the same pair
        let records = vec![record("a", "b", 5.0, 1), record("b", "a", 5.0, 2)];
        assert_eq!(find_duplicate_pairs(&records), vec![false, false]);
    }
}
