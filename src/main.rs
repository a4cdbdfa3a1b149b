//! Rating QA Analyzer - Main Application
//!
//! Entry point for the product rating QA analyzer. All work happens in the
//! `rating_qa` module of the library crate.
//!
//! # Usage
//!
//! ```bash
//! # Analyze Data/ratings_Electronics.csv, export Data/suspicious_5_star_users.csv
//! $ cargo run --release
//!
//! # With custom paths
//! $ cargo run --release -- --input path/to/ratings.csv --output path/to/flagged.csv
//! ```

use rating_qa_rust::rating_qa_main;

/// call from module
fn main() {
    rating_qa_main();
}
