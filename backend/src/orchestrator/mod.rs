//! Orchestrator - end-to-end analysis pipeline
//!
//! See `engine.rs` for the pipeline and `report.rs` for the saved output.

pub mod engine;
pub mod report;

pub use engine::{AnalysisConfig, AnalysisError, Analyzer};
pub use report::{compute_dataset_hash, compute_log_hash, validate_report, AnalysisReport};
