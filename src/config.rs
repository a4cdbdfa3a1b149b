//! Command line configuration.
//!
//! Every flag has a default, so running with no arguments analyzes
//! `Data/ratings_Electronics.csv` and writes `Data/suspicious_5_star_users.csv`.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{QaResult, RatingQaError};
use crate::record::Rating;

pub const DEFAULT_INPUT_PATH: &str = "Data/ratings_Electronics.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "Data/suspicious_5_star_users.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Rating QA - flags max-rating-only accounts and duplicate reviews
#[derive(Debug, Parser)]
#[command(name = "rating_qa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Headerless ratings file: user_id,product_id,rating,timestamp
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Where the suspicious user list is written
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Pin the rating suspicious users must always give (defaults to the highest rating observed)
    #[arg(short, long)]
    pub target_rating: Option<f64>,

    /// Rows shown in the dataset preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    /// Entries shown in the suspicious-user and duplicate samples
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Skip the rating distribution chart
    #[arg(long)]
    pub no_chart: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the verbosity count; `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn into_config(self) -> QaResult<AnalysisConfig> {
        let target_rating = match self.target_rating {
            Some(value) => Some(Rating::new(value).ok_or_else(|| {
                RatingQaError::Config(format!("target rating must be a finite number, got {}", value))
            })?),
            None => None,
        };

        Ok(AnalysisConfig {
            input_path: self.input,
            output_path: self.output,
            target_rating,
            preview_rows: self.preview_rows,
            sample_size: self.sample_size,
            show_chart: !self.no_chart,
        })
    }
}

/// Settings consumed by the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_rating: Option<Rating>,
    pub preview_rows: usize,
    pub sample_size: usize,
    pub show_chart: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target_rating: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            show_chart: true,
        }
    }
}
