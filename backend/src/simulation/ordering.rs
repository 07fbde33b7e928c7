//! Time ordering of raw log records

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use super::SimulationError;
use crate::models::TransactionRecord;

/// Stable-sort records by (date + time timestamp, arrival_time_min)
///
/// Records with identical keys keep their original relative order.
///
/// # Errors
/// - `MissingField` if a record has no `arrival_time_min`
/// - `InvariantViolation` if a record's timestamp is absent or unparsable
///   (the log cannot be ordered)
pub fn order_records(records: Vec<TransactionRecord>) -> Result<Vec<TransactionRecord>, SimulationError> {
    let mut keyed: Vec<(NaiveDateTime, f64, TransactionRecord)> = records
        .into_iter()
        .map(|record| {
            let timestamp = record
                .timestamp()
                .map_err(|e| SimulationError::InvariantViolation(format!("record not orderable: {}", e)))?;
            let arrival = record
                .arrival_time_min()
                .ok_or_else(|| SimulationError::MissingField {
                    record_id: record.id().to_string(),
                    field: "arrival_time_min",
                })?;
            Ok((timestamp, arrival, record))
        })
        .collect::<Result<_, SimulationError>>()?;

    keyed.sort_by(|a, b| match a.0.cmp(&b.0) {
        Ordering::Equal => a.1.total_cmp(&b.1),
        other => other,
    });

    Ok(keyed.into_iter().map(|(_, _, record)| record).collect())
}
