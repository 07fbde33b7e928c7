//! Type conversion utilities for FFI boundary
//!
//! Converts between Python dicts and the core's record / scenario types.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::models::{AnnotatedRecord, Period, TransactionRecord};
use crate::queueing::{ScenarioOutcome, ScenarioParameters, ScenarioRow};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing; conversion errors propagate.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract an optional field; Python `None` counts as missing.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

// ========================================================================
// Python → Rust
// ========================================================================

/// Parse one log row
///
/// Timing fields are passed through as optional so the core reports
/// missing values with the record id.
pub fn parse_record(dict: &Bound<'_, PyDict>) -> PyResult<TransactionRecord> {
    let mut record = TransactionRecord::empty()
        .with_arrival(extract_optional(dict, "arrival_time_min")?)
        .with_service(extract_optional(dict, "service_time_min")?)
        .with_downtime(extract_optional(dict, "downtime_duration_min")?)
        .with_downtime_event(extract_optional(dict, "downtime_event")?.unwrap_or(false))
        .with_queue_length(extract_optional(dict, "queue_length")?.unwrap_or(0))
        .with_transaction_type(extract_optional::<String>(dict, "transaction_type")?.unwrap_or_default());

    if let Some(id) = extract_optional::<String>(dict, "id")? {
        record = record.with_id(id);
    }
    if let (Some(date), Some(time)) = (
        extract_optional::<String>(dict, "date")?,
        extract_optional::<String>(dict, "time")?,
    ) {
        record = record.with_timestamp(date, time);
    }
    if let Some(period) = extract_optional::<String>(dict, "period")? {
        record = record.with_period(parse_period(&period)?);
    }
    if let Some(server) = extract_optional::<String>(dict, "server_id")? {
        record = record.with_server(server);
    }
    Ok(record)
}

fn parse_period(value: &str) -> PyResult<Period> {
    match value {
        "Peak" => Ok(Period::Peak),
        "Off-Peak" => Ok(Period::OffPeak),
        other => Err(PyValueError::new_err(format!(
            "Unknown period '{}', expected 'Peak' or 'Off-Peak'",
            other
        ))),
    }
}

pub fn parse_scenario(dict: &Bound<'_, PyDict>) -> PyResult<ScenarioParameters> {
    Ok(ScenarioParameters::new(
        extract_required::<String>(dict, "label")?,
        extract_required(dict, "arrival_rate")?,
        extract_required(dict, "service_rate")?,
        extract_required(dict, "servers")?,
    ))
}

// ========================================================================
// Rust → Python
// ========================================================================

pub fn annotated_to_py<'py>(py: Python<'py>, annotated: &AnnotatedRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    let record = &annotated.record;
    dict.set_item("id", record.id())?;
    dict.set_item("date", record.date())?;
    dict.set_item("time", record.time())?;
    dict.set_item("arrival_time_min", record.arrival_time_min())?;
    dict.set_item("service_time_min", record.service_time_min())?;
    dict.set_item("downtime_duration_min", record.downtime_duration_min())?;
    dict.set_item("downtime_event", record.downtime_event())?;
    dict.set_item("queue_length", record.queue_length())?;
    dict.set_item("transaction_type", record.transaction_type())?;
    dict.set_item("period", record.period().map(|p| p.label()))?;
    dict.set_item("server_id", record.server_id())?;
    dict.set_item("channel", &annotated.channel)?;
    dict.set_item("service_start_min", annotated.service_start_min)?;
    dict.set_item("waiting_time_min", annotated.waiting_time_min)?;
    Ok(dict)
}

/// Scenario row as a dict; `wq`/`lq` are floats for stable rows and the
/// descriptive label otherwise
pub fn scenario_row_to_py<'py>(py: Python<'py>, row: &ScenarioRow) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("label", &row.label)?;
    dict.set_item("arrival_rate", row.arrival_rate)?;
    dict.set_item("service_rate", row.service_rate)?;
    dict.set_item("servers", row.servers)?;
    dict.set_item("utilization", row.utilization)?;
    match row.outcome {
        ScenarioOutcome::Stable { wq, lq } => {
            dict.set_item("outcome", "Stable")?;
            dict.set_item("wq", wq)?;
            dict.set_item("lq", lq)?;
        }
        ScenarioOutcome::Boundary => {
            dict.set_item("outcome", "Boundary")?;
            dict.set_item("wq", row.wq_label(2))?;
            dict.set_item("lq", row.lq_label(2))?;
        }
        ScenarioOutcome::Divergent => {
            dict.set_item("outcome", "Divergent")?;
            dict.set_item("wq", row.wq_label(2))?;
            dict.set_item("lq", row.lq_label(2))?;
        }
    }
    Ok(dict)
}
