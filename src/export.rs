//! Flags suspicious users on the dataset and exports their ids.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::{debug, info};

use crate::error::{QaResult, RatingQaError};
use crate::record::RatingDataset;

/// Single header column of the exported file.
pub const USER_ID_HEADER: &str = "user_id";

impl RatingDataset {
    /// Adds the flag column: true iff the record's user is in `suspicious_users`.
    ///
    /// Membership test only; nothing is re-derived from the ratings. Returns
    /// the number of records flagged.
    pub fn flag_users(&mut self, suspicious_users: &[String]) -> usize {
        let members: HashSet<&str> = suspicious_users.iter().map(String::as_str).collect();

        let flags: Vec<bool> = self
            .records()
            .iter()
            .map(|record| members.contains(record.user_id.as_str()))
            .collect();

        let flagged = flags.iter().filter(|&&flag| flag).count();
        self.only_max_rating_user = flags;

        debug!(flagged, "flag column added");
        flagged
    }
}

/// Writes the suspicious user ids to a CSV file at `path`.
///
/// The parent directory is created when missing. Any failure aborts with
/// `Export` (or `Io` for the directory).
///
/// # Arguments
///
/// * `path` - Destination CSV path
/// * `suspicious_users` - Unique user ids in detector order
///
/// # Returns
///
/// * `QaResult<usize>` - Number of user rows written
pub fn export_suspicious_users(path: impl AsRef<Path>, suspicious_users: &[String]) -> QaResult<usize> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RatingQaError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let writer = Writer::from_path(path).map_err(|e| RatingQaError::export(path, e))?;
    let written = write_suspicious_users(writer, suspicious_users)
        .map_err(|e| RatingQaError::export(path, e))?;

    info!(path = %path.display(), users = written, "suspicious users exported");
    Ok(written)
}

/// Writes the `user_id` header then one id per row; no index column.
pub fn write_suspicious_users<W: Write>(mut writer: Writer<W>, suspicious_users: &[String]) -> csv::Result<usize> {
    writer.write_record([USER_ID_HEADER])?;
    for user_id in suspicious_users {
        writer.write_record([user_id.as_str()])?;
    }
    writer.flush()?;

    Ok(suspicious_users.len())
}
