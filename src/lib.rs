//! Product rating quality-assurance analysis.
//!
//! See [`rating_qa`] for the pipeline and its stages.

pub mod anomaly;
pub mod config;
pub mod descriptive;
pub mod error;
pub mod export;
pub mod loader;
pub mod rating_qa;
pub mod record;
pub mod summary;

pub use error::{QaResult, RatingQaError};
pub use rating_qa::{AnalysisOutcome, rating_qa_main, run_analysis};
