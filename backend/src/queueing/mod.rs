//! Analytical queueing models
//!
//! - **mmc**: closed-form M/M/c steady-state metrics
//! - **scenario**: named what-if comparison built on the M/M/c model

pub mod mmc;
pub mod scenario;

pub use mmc::{mmc_metrics, MmcModel, QueueMetrics, QueueModelError, QueueValue};
pub use scenario::{
    default_scenarios, ScenarioEvaluator, ScenarioOutcome, ScenarioParameters, ScenarioRow,
    BOUNDARY_LABEL, DIVERGENT_LABEL,
};
