//! # Product Rating QA Analyzer
//!
//! Loads a flat file of product ratings and runs a fixed sequence of quality
//! checks over it, printing a human-readable report and exporting the list of
//! accounts whose every rating is the maximum score.
//!
//! ## Stages
//!
//! 1. Load `user_id,product_id,rating,timestamp` rows (no header)
//! 2. Describe the dataset: counts, preview, distinct ratings, histogram, chart
//! 3. Detect max-rating-only users and duplicate (user, product) pairs
//! 4. Flag suspicious users' records and export their ids to CSV
//! 5. Print the QA summary block
//!
//! ## Usage
//!
//! ```bash
//! # Fixed default paths under Data/
//! $ cargo run --release
//!
//! # Custom input and output, literal 5-star target
//! $ cargo run --release -- --input ratings.csv --output flagged.csv --target-rating 5
//! ```

use std::io::{self, Write};
use std::process;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::anomaly::{AnomalyReport, detect_anomalies, resolve_target_rating};
use crate::config::{AnalysisConfig, Cli};
use crate::descriptive::{DatasetOverview, render_bar_chart, write_record_table};
use crate::error::QaResult;
use crate::export::export_suspicious_users;
use crate::loader::load_ratings;
use crate::summary::QaSummary;

/// Everything a run computed, returned alongside the printed report.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub summary: QaSummary,
    pub anomalies: AnomalyReport,
}

/// Runs the whole pipeline, writing the report to `out`.
///
/// The input is read once and held in memory; the only file written is the
/// suspicious-user export.
///
/// # Arguments
///
/// * `config` - Paths, target rating and report sizes
/// * `out` - Destination for the human-readable report (stdout in the binary)
///
/// # Returns
///
/// * `QaResult<AnalysisOutcome>` - The summary and anomaly results, or the
///   first fatal error (malformed input, failed export, failed report write)
pub fn run_analysis<W: Write>(config: &AnalysisConfig, out: &mut W) -> QaResult<AnalysisOutcome> {
    // Stage 1: load
    let mut dataset = load_ratings(&config.input_path)?;
    if dataset.is_empty() {
        warn!(
            path = %config.input_path.display(),
            "empty dataset: no rating rows loaded, all statistics will be zero"
        );
    }

    // Stage 2: describe
    let overview = DatasetOverview::from_dataset(&dataset, config.preview_rows);
    overview.write_report(out)?;

    if config.show_chart {
        writeln!(out)?;
        write!(out, "{}", render_bar_chart(&overview.histogram))?;
    }

    // Stage 3: detect
    let target_rating = resolve_target_rating(config.target_rating, dataset.records());
    let anomalies = detect_anomalies(dataset.records(), target_rating);
    let rating_label = match target_rating {
        Some(rating) => format!("{}-rating", rating),
        None => "max-rating".to_string(),
    };

    writeln!(
        out,
        "\nUsers who only gave {} reviews: {}",
        rating_label,
        anomalies.suspicious_users.len()
    )?;
    writeln!(out, "\nSample of users who only gave {} reviews:", rating_label)?;
    let sample: Vec<&str> = anomalies
        .suspicious_users
        .iter()
        .take(config.sample_size)
        .map(String::as_str)
        .collect();
    writeln!(out, "{:?}", sample)?;

    let duplicate_count = anomalies.duplicate_count();
    writeln!(out, "\nDuplicate user/product review pairs found: {}", duplicate_count)?;
    if duplicate_count > 0 {
        writeln!(out, "\nSample duplicate entries:")?;
        let duplicates = dataset
            .records()
            .iter()
            .enumerate()
            .zip(&anomalies.duplicate_flags)
            .filter(|&(_, &is_duplicate)| is_duplicate)
            .map(|(row, _)| row)
            .take(config.sample_size);
        write_record_table(out, duplicates)?;
    }

    // Stage 4: flag and export
    let flagged = dataset.flag_users(&anomalies.suspicious_users);
    info!(flagged, "records from suspicious users flagged");

    export_suspicious_users(&config.output_path, &anomalies.suspicious_users)?;
    writeln!(
        out,
        "\nSuspicious user list exported to: {}",
        config.output_path.display()
    )?;

    // Stage 5: summarize
    let summary = QaSummary::compute(
        &dataset,
        target_rating,
        anomalies.suspicious_users.len(),
        duplicate_count,
    );
    writeln!(out, "\n{}\n", summary)?;
    out.flush()?;

    Ok(AnalysisOutcome { summary, anomalies })
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides `default_filter`.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Main entry point for the rating QA analyzer.
///
/// Parses command line arguments, initializes logging, runs the analysis
/// against stdout, and exits with status 1 on any fatal error.
pub fn rating_qa_main() {
    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let config = cli.into_config().unwrap_or_else(|err| {
        eprintln!("Error: {}", err);
        process::exit(1);
    });

    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        "starting rating QA analysis"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = run_analysis(&config, &mut out) {
        eprintln!("Error analyzing ratings: {}", err);
        process::exit(1);
    }
}
