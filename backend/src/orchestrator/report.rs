//! Analysis report - save/load results of one pipeline run
//!
//! A report bundles the annotated log with every derived table so the
//! charting side can render without recomputing anything.
//!
//! # Critical Invariants
//!
//! - **Dataset binding**: `dataset_hash` identifies the ordered input log
//! - **Completeness**: one annotated record per input record, unique ids
//! - **Non-negative waits**: every service start is at or after its arrival

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use super::engine::AnalysisError;
use crate::analysis::{
    DowntimeImpact, HistogramBin, ModelComparison, PeriodSummary, QueuePoint, TransactionTypeSummary,
};
use crate::models::{AnnotatedRecord, TransactionRecord};
use crate::queueing::ScenarioRow;

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// SHA256 of the ordered input log (generated ids excluded)
    pub dataset_hash: String,

    pub record_count: usize,

    pub channel_count: usize,

    /// Input records in time order with service start and waiting time
    pub annotated: Vec<AnnotatedRecord>,

    /// All / Peak / Off-Peak waiting-time summaries
    pub waiting_by_period: Vec<PeriodSummary>,

    pub histogram: Vec<HistogramBin>,

    pub queue_series: Vec<QueuePoint>,

    pub transaction_types: Vec<TransactionTypeSummary>,

    pub downtime_impact: DowntimeImpact,

    /// Scenario table, in configured order
    pub scenarios: Vec<ScenarioRow>,

    /// Absent when the log is too short to estimate rates
    pub comparison: Option<ModelComparison>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::Serialization(format!("Report serialization failed: {}", e)))
    }

    /// Load a report and check its invariants
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let report: AnalysisReport = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Serialization(format!("Report deserialization failed: {}", e)))?;
        validate_report(&report)?;
        Ok(report)
    }
}

/// Compute deterministic SHA256 hash of any serializable value
///
/// Object keys are sorted before hashing so the digest does not depend on
/// field or map ordering.
pub fn compute_dataset_hash<T: Serialize>(data: &T) -> Result<String, AnalysisError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(data)
        .map_err(|e| AnalysisError::Serialization(format!("Dataset serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| AnalysisError::Serialization(format!("Dataset serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA256 of a time-ordered log, over the data the caller supplied
///
/// Ids generated for rows that had none are left out, so loading the same
/// log twice yields the same hash.
pub fn compute_log_hash(records: &[TransactionRecord]) -> Result<String, AnalysisError> {
    let rows = records
        .iter()
        .map(|record| {
            let mut row = serde_json::to_value(record)?;
            if !record.id_supplied() {
                if let serde_json::Value::Object(map) = &mut row {
                    map.remove("id");
                }
            }
            Ok(row)
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()
        .map_err(|e| AnalysisError::Serialization(format!("Dataset serialization failed: {}", e)))?;
    compute_dataset_hash(&rows)
}

/// Validate report integrity
///
/// Checks:
/// - Record count matches the annotated records
/// - Record ids are unique
/// - Waits are non-negative and consistent with service start
pub fn validate_report(report: &AnalysisReport) -> Result<(), AnalysisError> {
    if report.record_count != report.annotated.len() {
        return Err(AnalysisError::ReportValidation(format!(
            "record_count {} does not match {} annotated records",
            report.record_count,
            report.annotated.len()
        )));
    }

    let mut seen = HashSet::with_capacity(report.annotated.len());
    for annotated in &report.annotated {
        if !seen.insert(annotated.id()) {
            return Err(AnalysisError::ReportValidation(format!(
                "duplicate record {}",
                annotated.id()
            )));
        }
        if annotated.waiting_time_min < 0.0 {
            return Err(AnalysisError::ReportValidation(format!(
                "record {} has negative waiting time {}",
                annotated.id(),
                annotated.waiting_time_min
            )));
        }
        if let Some(arrival) = annotated.record.arrival_time_min() {
            let expected = annotated.service_start_min - arrival;
            if (expected - annotated.waiting_time_min).abs() > 1e-9 {
                return Err(AnalysisError::ReportValidation(format!(
                    "record {} waiting time {} does not match service start {}",
                    annotated.id(),
                    annotated.waiting_time_min,
                    annotated.service_start_min
                )));
            }
        }
    }

    Ok(())
}
