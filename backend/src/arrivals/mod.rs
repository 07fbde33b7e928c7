//! Synthetic ATM transaction log generation
//!
//! Produces transaction logs with the same columns as the recorded ATM
//! dataset, for demos and for checking the simulator against the M/M/c
//! formulas. All generation is deterministic based on the RNG seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same log, ids included
//! 2. **Poisson arrivals**: exponential inter-arrival times at `arrival_rate_per_hour`
//! 3. **Exponential service**: service times at `service_rate_per_hour`
//! 4. **Observed queue length**: customers still in a single-ATM system at arrival
//!
//! # Example
//!
//! ```
//! use atm_queue_core_rs::arrivals::{generate_log, SyntheticLogConfig};
//!
//! let config = SyntheticLogConfig {
//!     seed: 42,
//!     count: 100,
//!     ..SyntheticLogConfig::default()
//! };
//! let log = generate_log(&config).unwrap();
//! assert_eq!(log.len(), 100);
//! ```

use chrono::{Duration, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::core::time::{format_timestamp, parse_timestamp, MINUTES_PER_HOUR};
use crate::models::{Period, TransactionRecord};
use crate::rng::RngManager;

/// Errors raised by the log generator
#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("Invalid synthetic log config: {0}")]
    InvalidConfig(String),
}

/// Configuration of one synthetic log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticLogConfig {
    pub seed: u64,

    /// Number of records to generate
    pub count: usize,

    /// Reference origin (`arrival_time_min` = 0), `YYYY-MM-DD`
    pub start_date: String,

    /// Reference origin time of day, `HH:MM` or `HH:MM:SS`
    pub start_time: String,

    /// λ, customers per hour
    pub arrival_rate_per_hour: f64,

    /// μ, customers per hour
    pub service_rate_per_hour: f64,

    /// Probability a transaction is followed by a machine fault
    #[serde(default)]
    pub downtime_probability: f64,

    #[serde(default = "default_mean_downtime")]
    pub mean_downtime_min: f64,

    /// Hours `[start, end)` logged as Peak
    #[serde(default = "default_peak_hours")]
    pub peak_hours: (u32, u32),

    #[serde(default = "default_transaction_types")]
    pub transaction_types: Vec<String>,
}

fn default_mean_downtime() -> f64 {
    5.0
}

fn default_peak_hours() -> (u32, u32) {
    (11, 14)
}

fn default_transaction_types() -> Vec<String> {
    ["Withdrawal", "Deposit", "Balance Inquiry", "Transfer"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SyntheticLogConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            count: 500,
            start_date: "2024-03-01".to_string(),
            start_time: "08:00".to_string(),
            arrival_rate_per_hour: 15.0,
            service_rate_per_hour: 20.0,
            downtime_probability: 0.0,
            mean_downtime_min: default_mean_downtime(),
            peak_hours: default_peak_hours(),
            transaction_types: default_transaction_types(),
        }
    }
}

impl SyntheticLogConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let invalid = |msg: String| Err(GeneratorError::InvalidConfig(msg));

        if !(self.arrival_rate_per_hour.is_finite() && self.arrival_rate_per_hour > 0.0) {
            return invalid(format!("arrival_rate_per_hour must be positive, got {}", self.arrival_rate_per_hour));
        }
        if !(self.service_rate_per_hour.is_finite() && self.service_rate_per_hour > 0.0) {
            return invalid(format!("service_rate_per_hour must be positive, got {}", self.service_rate_per_hour));
        }
        if !(0.0..=1.0).contains(&self.downtime_probability) {
            return invalid(format!("downtime_probability must be in [0, 1], got {}", self.downtime_probability));
        }
        if self.downtime_probability > 0.0 && !(self.mean_downtime_min.is_finite() && self.mean_downtime_min > 0.0) {
            return invalid(format!("mean_downtime_min must be positive, got {}", self.mean_downtime_min));
        }
        let (peak_start, peak_end) = self.peak_hours;
        if peak_start > peak_end || peak_end > 24 {
            return invalid(format!("peak_hours ({}, {}) is not a valid hour range", peak_start, peak_end));
        }
        if self.transaction_types.is_empty() {
            return invalid("transaction_types must not be empty".to_string());
        }
        if parse_timestamp(&self.start_date, &self.start_time).is_none() {
            return invalid(format!("unparsable start '{} {}'", self.start_date, self.start_time));
        }
        Ok(())
    }
}

/// Generate a synthetic transaction log, ordered by arrival
pub fn generate_log(config: &SyntheticLogConfig) -> Result<Vec<TransactionRecord>, GeneratorError> {
    config.validate()?;
    let origin = parse_timestamp(&config.start_date, &config.start_time).ok_or_else(|| {
        GeneratorError::InvalidConfig(format!("unparsable start '{} {}'", config.start_date, config.start_time))
    })?;

    let mut rng = RngManager::new(config.seed);
    let arrival_rate = config.arrival_rate_per_hour / MINUTES_PER_HOUR;
    let service_rate = config.service_rate_per_hour / MINUTES_PER_HOUR;
    let (peak_start, peak_end) = config.peak_hours;

    let mut records = Vec::with_capacity(config.count);
    let mut clock = 0.0;
    let mut server_free = 0.0;
    // finish times of customers still in the system, non-decreasing
    let mut in_system: VecDeque<f64> = VecDeque::new();

    for i in 0..config.count {
        clock += rng.exponential(arrival_rate);
        let service = rng.exponential(service_rate);
        let downtime_event = config.downtime_probability > 0.0 && rng.chance(config.downtime_probability);
        let downtime = if downtime_event {
            rng.exponential(1.0 / config.mean_downtime_min)
        } else {
            0.0
        };
        let transaction_type = &config.transaction_types[rng.index(config.transaction_types.len())];

        while in_system.front().is_some_and(|&finish| finish <= clock) {
            in_system.pop_front();
        }
        let queue_length = in_system.len() as u32;

        let start = clock.max(server_free);
        server_free = start + service + downtime;
        in_system.push_back(server_free);

        let timestamp = origin + Duration::milliseconds((clock * 60_000.0).round() as i64);
        let (date, time) = format_timestamp(&timestamp);
        let period = if (peak_start..peak_end).contains(&timestamp.hour()) {
            Period::Peak
        } else {
            Period::OffPeak
        };

        records.push(
            TransactionRecord::new(clock, service, downtime)
                .with_id(format!("tx_{:06}", i))
                .with_timestamp(date, time)
                .with_downtime_event(downtime_event)
                .with_queue_length(queue_length)
                .with_transaction_type(transaction_type.clone())
                .with_period(period),
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_log() {
        let config = SyntheticLogConfig {
            count: 50,
            downtime_probability: 0.2,
            ..SyntheticLogConfig::default()
        };
        assert_eq!(generate_log(&config).unwrap(), generate_log(&config).unwrap());
    }

    #[test]
    fn test_different_seed_different_log() {
        let a = generate_log(&SyntheticLogConfig { seed: 1, count: 20, ..Default::default() }).unwrap();
        let b = generate_log(&SyntheticLogConfig { seed: 2, count: 20, ..Default::default() }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_arrivals_increase() {
        let log = generate_log(&SyntheticLogConfig { count: 200, ..Default::default() }).unwrap();
        for pair in log.windows(2) {
            assert!(pair[0].arrival_time_min() < pair[1].arrival_time_min());
        }
    }

    #[test]
    fn test_no_downtime_when_probability_zero() {
        let log = generate_log(&SyntheticLogConfig { count: 100, ..Default::default() }).unwrap();
        assert!(log.iter().all(|r| !r.downtime_event() && r.downtime_duration_min() == Some(0.0)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SyntheticLogConfig {
            service_rate_per_hour: 0.0,
            ..Default::default()
        };
        assert!(matches!(generate_log(&config), Err(GeneratorError::InvalidConfig(_))));

        let config = SyntheticLogConfig {
            peak_hours: (15, 12),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
