//! Domain models for the ATM queue analysis

pub mod record;

// Re-exports
pub use record::{AnnotatedRecord, Period, RecordError, Timing, TransactionRecord};
