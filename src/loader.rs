//! # Ratings Loader
//!
//! Reads the headerless ratings file into a [`RatingDataset`].
//!
//! Each line carries exactly four positional fields:
//!
//! ```text
//! user_id,product_id,rating,timestamp
//! A3SBTW3WS4IQSN,B007WTAJTO,5.0,1365811200
//! ```
//!
//! The rating is parsed as a number and the timestamp (integer seconds since
//! the Unix epoch) is normalized to a UTC datetime. Loading is all-or-nothing:
//! the first malformed row aborts with a `DataFormat` error naming the line.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::DateTime;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{QaResult, RatingQaError};
use crate::record::{INPUT_COLUMNS, Rating, RatingDataset, RatingRecord};

/// Positional shape of one input row before validation.
///
/// Ids are kept exactly as written; only the numeric fields are trimmed.
#[derive(Debug, Deserialize)]
struct RawRating {
    user_id: String,
    product_id: String,
    rating: String,
    timestamp: String,
}

impl RawRating {
    fn into_record(self) -> Result<RatingRecord, String> {
        if self.user_id.is_empty() {
            return Err("missing user_id".to_string());
        }
        if self.product_id.is_empty() {
            return Err("missing product_id".to_string());
        }

        let value: f64 = self
            .rating
            .trim()
            .parse()
            .map_err(|_| format!("rating '{}' is not a number", self.rating))?;
        let rating = Rating::new(value)
            .ok_or_else(|| format!("rating '{}' is not a finite number", self.rating))?;

        let seconds: i64 = self
            .timestamp
            .trim()
            .parse()
            .map_err(|_| format!("timestamp '{}' is not an integer number of seconds", self.timestamp))?;
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| format!("timestamp {} is out of range", seconds))?;

        Ok(RatingRecord {
            user_id: self.user_id,
            product_id: self.product_id,
            rating,
            timestamp,
        })
    }
}

/// Loads the ratings file at `path`.
///
/// # Arguments
///
/// * `path` - Path to the headerless, comma-delimited ratings file
///
/// # Returns
///
/// * `QaResult<RatingDataset>` - All rows in file order, or a `DataFormat`
///   error if the file cannot be opened or any row is malformed
pub fn load_ratings(path: impl AsRef<Path>) -> QaResult<RatingDataset> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading ratings");

    let file = File::open(path).map_err(|e| {
        RatingQaError::data_format(path, None, format!("cannot open input file: {}", e))
    })?;

    let records = read_ratings(BufReader::new(file), path)?;
    info!(rows = records.len(), "ratings loaded");

    Ok(RatingDataset::new(records))
}

/// Parses ratings from any reader.
///
/// `source` only labels errors; nothing is opened through it.
pub fn read_ratings<R: Read>(reader: R, source: &Path) -> QaResult<Vec<RatingRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = StringRecord::new();

    loop {
        match csv_reader.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map(|p| p.line());
                return Err(RatingQaError::data_format(source, line, e.to_string()));
            }
        }

        let line = row.position().map(|p| p.line());

        // Arity is checked before deserializing so the message names the real problem
        if row.len() != INPUT_COLUMNS.len() {
            return Err(RatingQaError::data_format(
                source,
                line,
                format!("expected {} fields, found {}", INPUT_COLUMNS.len(), row.len()),
            ));
        }

        let raw: RawRating = row
            .deserialize(None)
            .map_err(|e| RatingQaError::data_format(source, line, e.to_string()))?;
        let record = raw
            .into_record()
            .map_err(|reason| RatingQaError::data_format(source, line, reason))?;

        records.push(record);
    }

    debug!(rows = records.len(), source = %source.display(), "parsed rating rows");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::find_duplicate_pairs;
    use std::fs;
    use tempfile::tempdir;

    fn parse(input: &str) -> QaResult<Vec<RatingRecord>> {
        read_ratings(input.as_bytes(), Path::new("ratings.csv"))
    }

    #[test]
    fn test_reads_positional_rows() {
        let records = parse("u1,p1,5.0,1365811200\nu2,p2,3,1341100800\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, "u1");
        assert_eq!(records[0].product_id, "p1");
        assert_eq!(records[0].rating, Rating::new(5.0).unwrap());
        assert_eq!(records[0].timestamp.to_rfc3339(), "2013-04-13T00:00:00+00:00");
        assert_eq!(records[1].rating, Rating::new(3.0).unwrap());
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_arity_is_data_format_error() {
        let err = parse("u1,p1,5.0,1365811200\nu2,p2,4.0\n").unwrap_err();
        match err {
            RatingQaError::DataFormat { line, reason, .. } => {
                assert_eq!(line, Some(2));
                assert!(reason.contains("expected 4 fields, found 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_rating_is_rejected() {
        let err = parse("u1,p1,great,1365811200\n").unwrap_err();
        assert!(matches!(err, RatingQaError::DataFormat { line: Some(1), .. }));
    }

    #[test]
    fn test_fractional_timestamp_is_rejected() {
        let err = parse("u1,p1,5.0,1365811200.5\n").unwrap_err();
        assert!(matches!(err, RatingQaError::DataFormat { .. }));
    }

    #[test]
    fn test_nan_rating_is_rejected() {
        let err = parse("u1,p1,NaN,1365811200\n").unwrap_err();
        match err {
            RatingQaError::DataFormat { reason, .. } => assert!(reason.contains("finite")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_padded_ids_stay_distinct() {
        let records = parse("u1,p1,5,1\n u1 ,p1,4,2\n").unwrap();

        assert_eq!(records[1].user_id, " u1 ");
        assert_eq!(find_duplicate_pairs(&records), vec![false, false]);
    }

    #[test]
    fn test_numeric_fields_tolerate_padding() {
        let records = parse("u1,p1, 4.0 , 1365811200 \n").unwrap();
        assert_eq!(records[0].rating, Rating::new(4.0).unwrap());
        assert_eq!(records[0].timestamp.timestamp(), 1365811200);
    }

    #[test]
    fn test_empty_user_id_is_rejected() {
        let err = parse("u1,p1,5,1\n,p1,5,1\n").unwrap_err();
        match err {
            RatingQaError::DataFormat { line, reason, .. } => {
                assert_eq!(line, Some(2));
                assert!(reason.contains("missing user_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_product_id_is_rejected() {
        let err = parse("u1,,5,1\n").unwrap_err();
        match err {
            RatingQaError::DataFormat { line, reason, .. } => {
                assert_eq!(line, Some(1));
                assert!(reason.contains("missing product_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_data_format_error() {
        let dir = tempdir().unwrap();
        let err = load_ratings(dir.path().join("nope.csv")).unwrap_err();
        match err {
            RatingQaError::DataFormat { line, reason, .. } => {
                assert_eq!(line, None);
                assert!(reason.starts_with("cannot open input file"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ratings.csv");
        fs::write(&path, "u1,p1,5.0,1365811200\nu1,p2,5.0,1365811300\n").unwrap();

        let dataset = load_ratings(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.flags().is_empty());
    }
}
