//! Analyzer engine
//!
//! Runs the full analysis over one transaction log:
//!
//! ```text
//! 1. Order records by (date + time, arrival_time_min)
//! 2. Hash the ordered log
//! 3. Replay it through the configured service channels
//! 4. Summarize waits per period, build the waiting-time histogram
//! 5. Build queue-length series, transaction-type and downtime tables
//! 6. Evaluate the what-if scenario table
//! 7. Compare simulated waits with the M/M/c model for the observed rates
//! ```
//!
//! # Example
//!
//! ```rust
//! use atm_queue_core_rs::arrivals::{generate_log, SyntheticLogConfig};
//! use atm_queue_core_rs::orchestrator::{AnalysisConfig, Analyzer};
//!
//! let log = generate_log(&SyntheticLogConfig { count: 200, ..Default::default() }).unwrap();
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let report = analyzer.run(log).unwrap();
//!
//! assert_eq!(report.record_count, 200);
//! assert_eq!(report.channel_count, 1);
//! assert_eq!(report.scenarios.len(), 5);
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::report::{compute_log_hash, AnalysisReport};
use crate::analysis::{
    compare_with_model, downtime_impact, queue_length_series, transaction_type_summary, waiting_by_period,
    waiting_time_histogram, StatsError,
};
use crate::arrivals::GeneratorError;
use crate::core::time::MINUTES_PER_HOUR;
use crate::models::TransactionRecord;
use crate::queueing::{default_scenarios, QueueModelError, ScenarioEvaluator, ScenarioParameters, ScenarioRow};
use crate::simulation::{order_records, ChannelAssignment, SimulationError, WaitingTimeSimulator};

// ============================================================================
// Configuration
// ============================================================================

/// Complete analysis configuration
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minutes per rate time unit (60.0: rates per hour, waits in minutes)
    pub time_scale: f64,

    /// How records are spread over ATMs in the replay
    pub assignment: ChannelAssignment,

    /// What-if scenarios, evaluated in this order
    pub scenarios: Vec<ScenarioParameters>,

    /// Number of waiting-time histogram bins
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_scale: MINUTES_PER_HOUR,
            assignment: ChannelAssignment::Single,
            scenarios: default_scenarios(),
            histogram_bins: 30,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidConfig(format!("unreadable config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        if self.histogram_bins == 0 {
            return Err(AnalysisError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        self.assignment
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Model(#[from] QueueModelError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Report validation error: {0}")]
    ReportValidation(String),
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs the analysis pipeline for one configuration
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    simulator: WaitingTimeSimulator,
    evaluator: ScenarioEvaluator,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let simulator = WaitingTimeSimulator::new(config.assignment.clone())?;
        let evaluator = ScenarioEvaluator::new(config.time_scale)?;
        Ok(Self {
            config,
            simulator,
            evaluator,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluate the configured scenario table
    pub fn evaluate_scenarios(&self) -> Result<Vec<ScenarioRow>, AnalysisError> {
        Ok(self.evaluator.evaluate(&self.config.scenarios)?)
    }

    /// Run the full pipeline over a raw (unordered) log
    ///
    /// # Errors
    /// Any invalid record, scenario or statistic aborts the run; no
    /// partial report is returned.
    pub fn run(&self, records: Vec<TransactionRecord>) -> Result<AnalysisReport, AnalysisError> {
        let ordered = order_records(records)?;
        let dataset_hash = compute_log_hash(&ordered)?;
        let channel_count = self.simulator.channel_count(&ordered)?;
        let annotated = self.simulator.run(&ordered)?;

        let comparison = match compare_with_model(&annotated, channel_count as u32, self.config.time_scale) {
            Ok(comparison) => Some(comparison),
            Err(StatsError::InvalidParameter(reason)) => {
                info!("Skipping model comparison: {}", reason);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let report = AnalysisReport {
            dataset_hash,
            record_count: annotated.len(),
            channel_count,
            waiting_by_period: waiting_by_period(&annotated),
            histogram: waiting_time_histogram(&annotated, self.config.histogram_bins)?,
            queue_series: queue_length_series(&ordered)?,
            transaction_types: transaction_type_summary(&ordered)?,
            downtime_impact: downtime_impact(&ordered),
            scenarios: self.evaluate_scenarios()?,
            comparison,
            annotated,
        };

        info!(
            "Analyzed {} records on {} channel(s), dataset {}",
            report.record_count,
            report.channel_count,
            &report.dataset_hash[..12]
        );
        Ok(report)
    }
}
