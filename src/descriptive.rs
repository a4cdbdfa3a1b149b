//! # Descriptive Report
//!
//! Row and column counts, a preview of the first rows, distinct rating values,
//! the rating histogram, and a terminal bar chart of that histogram.
//!
//! Nothing here writes to disk. An empty dataset produces zero counts and an
//! empty histogram rather than an error.

use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

use crate::record::{Rating, RatingDataset, RatingRecord};

/// Rows tall of the plotting area of the bar chart.
const CHART_HEIGHT: u64 = 10;
/// Character width of each bar cell, gaps included.
const BAR_CELL_WIDTH: usize = 8;
/// Grid lines are drawn on every n-th row of the frequency axis.
const GRID_EVERY: u64 = 2;

pub const CHART_TITLE: &str = "Distribution of Product Ratings";
pub const X_AXIS_LABEL: &str = "Rating";
pub const Y_AXIS_LABEL: &str = "Number of Ratings";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot of the dataset's shape and rating distribution.
#[derive(Debug, Clone)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_names: Vec<&'static str>,
    pub preview: Vec<RatingRecord>,
    /// Distinct ratings in first-encounter order.
    pub distinct_ratings: Vec<Rating>,
    /// (rating, count) pairs sorted by rating ascending.
    pub histogram: Vec<(Rating, u64)>,
}

impl DatasetOverview {
    /// Builds the overview, keeping at most `preview_rows` records for the preview.
    pub fn from_dataset(dataset: &RatingDataset, preview_rows: usize) -> Self {
        let records = dataset.records();

        Self {
            row_count: records.len(),
            column_names: dataset.column_names(),
            preview: records.iter().take(preview_rows).cloned().collect(),
            distinct_ratings: distinct_ratings(records),
            histogram: rating_histogram(records),
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Writes the text part of the descriptive report.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Dataset loaded. {} rows and {} columns.\n",
            self.row_count,
            self.column_count()
        )?;

        writeln!(out, "First few rows:")?;
        write_record_table(out, self.preview.iter().enumerate())?;

        writeln!(out, "\nColumns: {:?}", self.column_names)?;
        writeln!(out, "\nTotal reviews: {}", self.row_count)?;

        let unique: Vec<String> = self.distinct_ratings.iter().map(Rating::to_string).collect();
        writeln!(out, "Unique rating values: [{}]", unique.join(", "))?;

        writeln!(out, "\nRating counts:")?;
        writeln!(out, "{:<10} {:<15}", "rating", "count")?;
        for (rating, count) in &self.histogram {
            writeln!(out, "{:<10} {:<15}", rating.to_string(), count)?;
        }

        Ok(())
    }
}

/// Distinct rating values in the order they first appear.
pub fn distinct_ratings(records: &[RatingRecord]) -> Vec<Rating> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| record.rating)
        .filter(|rating| seen.insert(*rating))
        .collect()
}

/// Frequency of each rating value, sorted by rating ascending.
pub fn rating_histogram(records: &[RatingRecord]) -> Vec<(Rating, u64)> {
    let mut counts: BTreeMap<Rating, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.rating).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Writes records as a fixed-width table with their dataset index.
///
/// Shared by the head preview and the duplicate sample.
pub fn write_record_table<'a, W, I>(out: &mut W, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (usize, &'a RatingRecord)>,
{
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        writeln!(out, "(no rows)")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:<20} {:<15} {:<8} {:<20}",
        "", "user_id", "product_id", "rating", "timestamp"
    )?;
    for (index, record) in rows {
        writeln!(
            out,
            "{:<8} {:<20} {:<15} {:<8} {:<20}",
            index,
            record.user_id,
            record.product_id,
            record.rating.to_string(),
            record.timestamp.format(TIMESTAMP_FORMAT).to_string()
        )?;
    }
    Ok(())
}

/// Renders the histogram as a vertical bar chart for the terminal.
///
/// Rating values run along the x-axis, counts up the y-axis. Dashed grid
/// lines mark every other tick of the frequency axis.
///
/// # Arguments
///
/// * `histogram` - (rating, count) pairs in the order the bars should appear
///
/// # Returns
///
/// * `String` - The chart, newline terminated
pub fn render_bar_chart(histogram: &[(Rating, u64)]) -> String {
    let mut chart = String::new();
    chart.push_str(CHART_TITLE);
    chart.push('\n');

    if histogram.is_empty() {
        chart.push_str("(no ratings to plot)\n");
        return chart;
    }

    let peak = histogram.iter().map(|&(_, count)| count).max().unwrap_or(0).max(1);
    let tick_width = peak.to_string().len();
    let plot_width = histogram.len() * BAR_CELL_WIDTH;

    chart.push_str(&format!("\n{}\n", Y_AXIS_LABEL));

    // Plot rows from the top of the frequency axis down
    for level in (1..=CHART_HEIGHT).rev() {
        let on_grid = level % GRID_EVERY == 0;

        let tick = if on_grid {
            format!("{:>width$}", peak * level / CHART_HEIGHT, width = tick_width)
        } else {
            " ".repeat(tick_width)
        };
        chart.push_str(&tick);
        chart.push_str(" |");

        for &(_, count) in histogram {
            // any non-zero count shows at least one row
            let filled = count * CHART_HEIGHT >= level * peak || (level == 1 && count > 0);
            let cell = if filled {
                "  ####  "
            } else if on_grid {
                " - - - -"
            } else {
                "        "
            };
            chart.push_str(cell);
        }
        chart.push('\n');
    }

    // x-axis, tick labels, then the axis title centered under the bars
    chart.push_str(&format!("{:>width$} +{}\n", 0, "-".repeat(plot_width), width = tick_width));

    chart.push_str(&" ".repeat(tick_width + 2));
    for (rating, _) in histogram {
        chart.push_str(&format!("{:^width$}", rating.to_string(), width = BAR_CELL_WIDTH));
    }
    chart.push('\n');

    chart.push_str(&" ".repeat(tick_width + 2));
    chart.push_str(&format!("{:^width$}", X_AXIS_LABEL, width = plot_width));
    chart.push('\n');

    chart
}
