//! Transaction record model
//!
//! One record is one customer's visit to an ATM, as captured in the
//! transaction log:
//! - Calendar `date` and wall-clock `time` (orderable timestamp)
//! - Arrival time in minutes since the log's reference origin
//! - Service duration and post-service downtime, in minutes
//! - Observed queue length, transaction type and Peak/Off-Peak period
//! - Optional server (ATM unit) assignment for multi-server runs
//!
//! Records are read-only once loaded. Service start and waiting time are
//! never stored on the record itself; the simulator returns them as
//! [`AnnotatedRecord`]s.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::time::parse_timestamp;

/// Time-of-day band a record was logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Peak")]
    Peak,
    #[serde(rename = "Off-Peak")]
    OffPeak,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Peak => "Peak",
            Period::OffPeak => "Off-Peak",
        }
    }
}

/// Errors raised while reading a record's fields
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Record {record_id} is missing required field '{field}'")]
    MissingField {
        record_id: String,
        field: &'static str,
    },

    #[error("Record {record_id} has invalid value {value} for '{field}'")]
    InvalidValue {
        record_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Record {record_id} has unparsable timestamp '{value}'")]
    InvalidTimestamp { record_id: String, value: String },
}

/// Validated timing fields of a record, all in minutes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub arrival_min: f64,
    pub service_min: f64,
    pub downtime_min: f64,
}

impl Timing {
    /// Time the channel becomes free again if service starts at `start_min`
    pub fn finish_from(&self, start_min: f64) -> f64 {
        start_min + self.service_min + self.downtime_min
    }
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One customer's ATM visit
///
/// # Example
/// ```
/// use atm_queue_core_rs::{Period, TransactionRecord};
///
/// let record = TransactionRecord::new(12.0, 3.5, 0.0)
///     .with_timestamp("2024-03-01", "09:12")
///     .with_period(Period::Peak)
///     .with_transaction_type("Withdrawal");
///
/// let timing = record.timing().unwrap();
/// assert_eq!(timing.arrival_min, 12.0);
/// assert_eq!(timing.finish_from(12.0), 15.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordRow")]
pub struct TransactionRecord {
    /// Stable identity used to merge simulation results back (UUID when not supplied)
    id: String,

    /// False when `id` was generated rather than read from the log
    #[serde(skip)]
    id_supplied: bool,

    date: Option<String>,

    time: Option<String>,

    arrival_time_min: Option<f64>,

    service_time_min: Option<f64>,

    downtime_duration_min: Option<f64>,

    downtime_event: bool,

    /// Queue length observed at arrival
    queue_length: u32,

    transaction_type: String,

    period: Option<Period>,

    /// ATM unit that served the record (explicit multi-server assignment)
    server_id: Option<String>,
}

/// One log row as read; every column may be absent
#[derive(Deserialize)]
struct RecordRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    arrival_time_min: Option<f64>,
    #[serde(default)]
    service_time_min: Option<f64>,
    #[serde(default)]
    downtime_duration_min: Option<f64>,
    #[serde(default)]
    downtime_event: bool,
    #[serde(default)]
    queue_length: u32,
    #[serde(default)]
    transaction_type: String,
    #[serde(default)]
    period: Option<Period>,
    #[serde(default)]
    server_id: Option<String>,
}

impl From<RecordRow> for TransactionRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id_supplied: row.id.is_some(),
            id: row.id.unwrap_or_else(new_record_id),
            date: row.date,
            time: row.time,
            arrival_time_min: row.arrival_time_min,
            service_time_min: row.service_time_min,
            downtime_duration_min: row.downtime_duration_min,
            downtime_event: row.downtime_event,
            queue_length: row.queue_length,
            transaction_type: row.transaction_type,
            period: row.period,
            server_id: row.server_id,
        }
    }
}

impl TransactionRecord {
    /// Create a record from its three timing fields
    pub fn new(arrival_time_min: f64, service_time_min: f64, downtime_duration_min: f64) -> Self {
        Self {
            id: new_record_id(),
            id_supplied: false,
            date: None,
            time: None,
            arrival_time_min: Some(arrival_time_min),
            service_time_min: Some(service_time_min),
            downtime_duration_min: Some(downtime_duration_min),
            downtime_event: downtime_duration_min > 0.0,
            queue_length: 0,
            transaction_type: String::new(),
            period: None,
            server_id: None,
        }
    }

    /// Create a record with every timing field absent (as read from a sparse log row)
    pub fn empty() -> Self {
        Self {
            id: new_record_id(),
            id_supplied: false,
            date: None,
            time: None,
            arrival_time_min: None,
            service_time_min: None,
            downtime_duration_min: None,
            downtime_event: false,
            queue_length: 0,
            transaction_type: String::new(),
            period: None,
            server_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.id_supplied = true;
        self
    }

    pub fn with_timestamp(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self.time = Some(time.into());
        self
    }

    pub fn with_arrival(mut self, arrival_time_min: Option<f64>) -> Self {
        self.arrival_time_min = arrival_time_min;
        self
    }

    pub fn with_service(mut self, service_time_min: Option<f64>) -> Self {
        self.service_time_min = service_time_min;
        self
    }

    pub fn with_downtime(mut self, downtime_duration_min: Option<f64>) -> Self {
        self.downtime_duration_min = downtime_duration_min;
        self
    }

    pub fn with_downtime_event(mut self, downtime_event: bool) -> Self {
        self.downtime_event = downtime_event;
        self
    }

    pub fn with_queue_length(mut self, queue_length: u32) -> Self {
        self.queue_length = queue_length;
        self
    }

    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = transaction_type.into();
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_server(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether `id` came from the caller rather than being generated
    pub fn id_supplied(&self) -> bool {
        self.id_supplied
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn arrival_time_min(&self) -> Option<f64> {
        self.arrival_time_min
    }

    pub fn service_time_min(&self) -> Option<f64> {
        self.service_time_min
    }

    pub fn downtime_duration_min(&self) -> Option<f64> {
        self.downtime_duration_min
    }

    pub fn downtime_event(&self) -> bool {
        self.downtime_event
    }

    pub fn queue_length(&self) -> u32 {
        self.queue_length
    }

    pub fn transaction_type(&self) -> &str {
        &self.transaction_type
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    /// Read and validate the timing fields
    ///
    /// # Errors
    /// - `MissingField` if arrival, service or downtime is absent
    /// - `InvalidValue` if any of them is negative or not finite
    pub fn timing(&self) -> Result<Timing, RecordError> {
        Ok(Timing {
            arrival_min: self.required("arrival_time_min", self.arrival_time_min)?,
            service_min: self.required("service_time_min", self.service_time_min)?,
            downtime_min: self.required("downtime_duration_min", self.downtime_duration_min)?,
        })
    }

    /// Combined `date` + `time` timestamp
    ///
    /// # Errors
    /// - `MissingField` if either column is absent
    /// - `InvalidTimestamp` if they do not parse
    pub fn timestamp(&self) -> Result<NaiveDateTime, RecordError> {
        let date = self.date.as_deref().ok_or_else(|| self.missing("date"))?;
        let time = self.time.as_deref().ok_or_else(|| self.missing("time"))?;
        parse_timestamp(date, time).ok_or_else(|| RecordError::InvalidTimestamp {
            record_id: self.id.clone(),
            value: format!("{} {}", date, time),
        })
    }

    fn required(&self, field: &'static str, value: Option<f64>) -> Result<f64, RecordError> {
        let value = value.ok_or_else(|| self.missing(field))?;
        if !value.is_finite() || value < 0.0 {
            return Err(RecordError::InvalidValue {
                record_id: self.id.clone(),
                field,
                value,
            });
        }
        Ok(value)
    }

    fn missing(&self, field: &'static str) -> RecordError {
        RecordError::MissingField {
            record_id: self.id.clone(),
            field,
        }
    }
}

/// A record annotated with its simulated service start and waiting time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: TransactionRecord,

    /// Channel (ATM unit) the record was simulated on
    pub channel: String,

    pub service_start_min: f64,

    /// `service_start_min - arrival_time_min`, never negative
    pub waiting_time_min: f64,
}

impl AnnotatedRecord {
    pub fn id(&self) -> &str {
        self.record.id()
    }
}
