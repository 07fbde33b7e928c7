//! Waiting-time simulation over transaction logs
//!
//! Assigns each record a service start and waiting time by replaying the
//! time-ordered log through one or more independent service channels.
//!
//! # Critical Invariants
//!
//! 1. **Per-channel recurrence**: a record starts at the later of its own
//!    arrival and the finish (start + service + downtime) of the previous
//!    record on the *same* channel
//! 2. **Channel independence**: channels never share capacity or state
//! 3. **Merge by identity**: results are attached to records by record id,
//!    never by recomputed position
//! 4. **No partial results**: the first bad record aborts the whole run
//!
//! # Example
//!
//! ```rust
//! use atm_queue_core_rs::simulation::{ChannelAssignment, WaitingTimeSimulator};
//! use atm_queue_core_rs::TransactionRecord;
//!
//! let records = vec![
//!     TransactionRecord::new(0.0, 5.0, 0.0),
//!     TransactionRecord::new(2.0, 1.0, 0.0),
//!     TransactionRecord::new(3.0, 1.0, 0.0),
//! ];
//!
//! let simulator = WaitingTimeSimulator::new(ChannelAssignment::Single).unwrap();
//! let annotated = simulator.run(&records).unwrap();
//!
//! let waits: Vec<f64> = annotated.iter().map(|r| r.waiting_time_min).collect();
//! assert_eq!(waits, vec![0.0, 3.0, 3.0]);
//! ```

pub mod assignment;
pub mod ordering;
pub mod waiting;

use thiserror::Error;

use crate::models::RecordError;

pub use assignment::{ChannelAssignment, ChannelPlan};
pub use ordering::order_records;
pub use waiting::{annotate_waiting_times, WaitingTimeSimulator};

/// Errors raised while ordering or simulating records
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Record {record_id} is missing required field '{field}'")]
    MissingField {
        record_id: String,
        field: &'static str,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<RecordError> for SimulationError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MissingField { record_id, field } => {
                SimulationError::MissingField { record_id, field }
            }
            other => SimulationError::InvariantViolation(other.to_string()),
        }
    }
}
