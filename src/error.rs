//! Error taxonomy for the rating QA pipeline.
//!
//! Every fatal condition aborts the whole run. An empty input file is not an
//! error; it is logged as a warning by the pipeline and all statistics degrade
//! to zero.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type QaResult<T> = Result<T, RatingQaError>;

#[derive(Debug, Error)]
pub enum RatingQaError {
    /// Input file missing, unreadable, or a row with the wrong arity/type.
    #[error("data format error in {}{}: {reason}", .path.display(), line_suffix(.line))]
    DataFormat {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },

    /// The suspicious-user CSV could not be written.
    #[error("failed to export suspicious users to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Filesystem failure while preparing the output location.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid command line configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing the human-readable report failed (closed stdout, full disk).
    #[error("failed to write report output: {0}")]
    Report(#[from] io::Error),
}

impl RatingQaError {
    pub fn data_format(path: &Path, line: Option<u64>, reason: impl Into<String>) -> Self {
        RatingQaError::DataFormat {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn export(path: &Path, source: csv::Error) -> Self {
        RatingQaError::Export {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}
