//! ATM Queue Analysis Core - Rust Engine
//!
//! Waiting-time simulation over ATM transaction logs and closed-form M/M/c
//! queueing metrics to validate it against.
//!
//! # Architecture
//!
//! - **core**: Timestamp handling
//! - **models**: Domain types (TransactionRecord, AnnotatedRecord)
//! - **queueing**: M/M/c model and what-if scenario table
//! - **simulation**: Single/multi-channel waiting-time replay
//! - **analysis**: Descriptive tables behind the report charts
//! - **arrivals**: Deterministic synthetic log generation
//! - **orchestrator**: End-to-end pipeline and saved report
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Waiting times are never negative; a negative wait is an error, not a clamp
//! 2. Channels are independent; results merge back by record id
//! 3. Analytical values are full precision; rounding is presentation

// Module declarations
pub mod analysis;
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod queueing;
pub mod rng;
pub mod simulation;

// Re-exports for convenience
pub use arrivals::{generate_log, SyntheticLogConfig};
pub use models::{AnnotatedRecord, Period, RecordError, TransactionRecord};
pub use orchestrator::{AnalysisConfig, AnalysisError, AnalysisReport, Analyzer};
pub use queueing::{
    mmc_metrics, MmcModel, QueueMetrics, QueueModelError, QueueValue, ScenarioEvaluator, ScenarioOutcome,
    ScenarioParameters, ScenarioRow,
};
pub use rng::RngManager;
pub use simulation::{annotate_waiting_times, order_records, ChannelAssignment, SimulationError, WaitingTimeSimulator};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn atm_queue_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::analyzer::evaluate_scenarios, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::analyzer::annotate_waiting_times, m)?)?;
    Ok(())
}
