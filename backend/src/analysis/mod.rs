//! Descriptive analysis of annotated transaction logs
//!
//! Computes the data behind the standard report charts (waiting-time
//! distribution, queue length over time, transaction-type breakdown,
//! downtime impact) and checks simulated waits against the M/M/c model.
//! Rendering is left to the caller.

pub mod stats;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{AnnotatedRecord, Period, RecordError, TransactionRecord};
use crate::queueing::{MmcModel, QueueModelError, QueueValue};
pub use stats::FiveNumberSummary;
use stats::{mean, quantile, sorted};

/// Errors raised by the descriptive analysis
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Model(#[from] QueueModelError),
}

/// Summary of waiting times for one slice of the log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitingSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub max: f64,
}

/// Waiting-time summary per period; `summary` is `None` for an empty slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub summary: Option<WaitingSummary>,
}

/// Summarize waiting times, optionally restricted to one period
pub fn waiting_time_summary(records: &[AnnotatedRecord], period: Option<Period>) -> Option<WaitingSummary> {
    let waits = sorted(
        records
            .iter()
            .filter(|r| period.is_none() || r.record.period() == period)
            .map(|r| r.waiting_time_min)
            .collect(),
    );
    Some(WaitingSummary {
        count: waits.len(),
        mean: mean(&waits)?,
        median: quantile(&waits, 0.5)?,
        p90: quantile(&waits, 0.9)?,
        max: *waits.last()?,
    })
}

/// Summaries for all records, Peak only and Off-Peak only, in that order
pub fn waiting_by_period(records: &[AnnotatedRecord]) -> Vec<PeriodSummary> {
    [None, Some(Period::Peak), Some(Period::OffPeak)]
        .into_iter()
        .map(|period| PeriodSummary {
            period: period.map_or("All", |p| p.label()).to_string(),
            summary: waiting_time_summary(records, period),
        })
        .collect()
}

/// One equal-width histogram bin, `[lower, upper)` (last bin closed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of waiting times over `[min, max]`
///
/// # Errors
/// `InvalidParameter` if `bins` is zero.
pub fn waiting_time_histogram(records: &[AnnotatedRecord], bins: usize) -> Result<Vec<HistogramBin>, StatsError> {
    if bins == 0 {
        return Err(StatsError::InvalidParameter("histogram needs at least one bin".to_string()));
    }
    let waits: Vec<f64> = records.iter().map(|r| r.waiting_time_min).collect();
    let (min, max) = match (
        waits.iter().copied().reduce(f64::min),
        waits.iter().copied().reduce(f64::max),
    ) {
        (Some(min), Some(max)) => (min, max),
        _ => return Ok(Vec::new()),
    };

    if max == min {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: waits.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for wait in waits {
        let index = (((wait - min) / width) as usize).min(bins - 1);
        histogram[index].count += 1;
    }
    Ok(histogram)
}

/// Observed queue length at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePoint {
    pub timestamp: NaiveDateTime,
    pub queue_length: u32,
}

/// Observed queue length over time, in timestamp order
pub fn queue_length_series(records: &[TransactionRecord]) -> Result<Vec<QueuePoint>, StatsError> {
    let mut points = records
        .iter()
        .map(|r| {
            Ok(QueuePoint {
                timestamp: r.timestamp()?,
                queue_length: r.queue_length(),
            })
        })
        .collect::<Result<Vec<_>, StatsError>>()?;
    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

/// Mean service time and volume for one transaction type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionTypeSummary {
    pub transaction_type: String,
    pub mean_service_time_min: f64,
    pub count: usize,
}

/// Per-type service time and count, sorted by type name
pub fn transaction_type_summary(records: &[TransactionRecord]) -> Result<Vec<TransactionTypeSummary>, StatsError> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let service = record.timing()?.service_min;
        let entry = groups.entry(record.transaction_type()).or_insert((0.0, 0));
        entry.0 += service;
        entry.1 += 1;
    }
    Ok(groups
        .into_iter()
        .map(|(transaction_type, (total, count))| TransactionTypeSummary {
            transaction_type: transaction_type.to_string(),
            mean_service_time_min: total / count as f64,
            count,
        })
        .collect())
}

/// Observed queue length with and without a downtime event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DowntimeImpact {
    pub without_downtime: Option<FiveNumberSummary>,
    pub with_downtime: Option<FiveNumberSummary>,
}

pub fn downtime_impact(records: &[TransactionRecord]) -> DowntimeImpact {
    let (with, without): (Vec<&TransactionRecord>, Vec<&TransactionRecord>) =
        records.iter().partition(|r| r.downtime_event());
    let lengths = |group: Vec<&TransactionRecord>| -> Vec<f64> { group.iter().map(|r| r.queue_length() as f64).collect() };
    DowntimeImpact {
        without_downtime: FiveNumberSummary::from_values(lengths(without)),
        with_downtime: FiveNumberSummary::from_values(lengths(with)),
    }
}

/// Simulated waits set against the M/M/c prediction for the observed rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// λ per time unit, from the arrival span
    pub observed_arrival_rate: f64,

    /// μ per time unit, from the mean of service + downtime
    pub observed_service_rate: f64,

    pub servers: u32,
    pub utilization: f64,
    pub simulated_mean_wait_min: f64,

    /// M/M/c `Wq` in minutes
    pub analytical_wait_min: QueueValue,
}

/// Estimate λ and μ from the log and compare waits with the M/M/c model
///
/// `time_scale` is the number of minutes in the rate time unit (60.0 for
/// per-hour rates).
///
/// # Errors
/// `InvalidParameter` with fewer than two records, a zero arrival span or
/// zero mean service time; model errors for invalid `servers`/`time_scale`.
pub fn compare_with_model(
    records: &[AnnotatedRecord],
    servers: u32,
    time_scale: f64,
) -> Result<ModelComparison, StatsError> {
    if records.len() < 2 {
        return Err(StatsError::InvalidParameter(
            "need at least two records to estimate rates".to_string(),
        ));
    }

    let mut first_arrival = f64::INFINITY;
    let mut last_arrival = f64::NEG_INFINITY;
    let mut busy_total = 0.0;
    for annotated in records {
        let timing = annotated.record.timing()?;
        first_arrival = first_arrival.min(timing.arrival_min);
        last_arrival = last_arrival.max(timing.arrival_min);
        busy_total += timing.service_min + timing.downtime_min;
    }

    let span = last_arrival - first_arrival;
    if span <= 0.0 {
        return Err(StatsError::InvalidParameter("arrivals span zero time".to_string()));
    }
    let mean_busy = busy_total / records.len() as f64;
    if mean_busy <= 0.0 {
        return Err(StatsError::InvalidParameter("mean service time is zero".to_string()));
    }

    let arrival_rate = (records.len() - 1) as f64 / span * time_scale;
    let service_rate = time_scale / mean_busy;
    let model = MmcModel::new(arrival_rate, service_rate, servers)?;
    let metrics = model.metrics(time_scale)?;
    let simulated_mean_wait_min =
        records.iter().map(|r| r.waiting_time_min).sum::<f64>() / records.len() as f64;

    Ok(ModelComparison {
        observed_arrival_rate: arrival_rate,
        observed_service_rate: service_rate,
        servers,
        utilization: metrics.utilization,
        simulated_mean_wait_min,
        analytical_wait_min: metrics.wq,
    })
}
