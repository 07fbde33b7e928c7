//! M/M/c steady-state model
//!
//! Closed-form metrics for a queue with Poisson arrivals (rate λ),
//! exponential service (rate μ per server) and `c` identical servers:
//!
//! ```text
//! ρ  = λ / (c·μ)
//! P0 = 1 / ( Σ_{n=0}^{c-1} (cρ)^n / n!  +  (cρ)^c / (c! · (1−ρ)) )
//! Lq = P0 · (cρ)^c · ρ / (c! · (1−ρ)²)
//! Wq = Lq / λ
//! ```
//!
//! For ρ ≥ 1 the queue has no steady state and `Lq`/`Wq` are reported as
//! [`QueueValue::Divergent`]. Values are full precision; rounding is left
//! to whoever renders them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the analytical model
#[derive(Debug, Error, PartialEq)]
pub enum QueueModelError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// A queue length or waiting time that may grow without bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum QueueValue {
    Finite(f64),
    Divergent,
}

impl QueueValue {
    pub fn finite(&self) -> Option<f64> {
        match self {
            QueueValue::Finite(v) => Some(*v),
            QueueValue::Divergent => None,
        }
    }

    pub fn is_divergent(&self) -> bool {
        matches!(self, QueueValue::Divergent)
    }
}

/// Steady-state metrics for one parameter set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// ρ = λ / (c·μ); reported even when unstable
    pub utilization: f64,

    /// P0, probability the system is empty (`None` when unstable)
    pub idle_probability: Option<f64>,

    /// Erlang-C probability that an arriving customer has to wait
    pub wait_probability: Option<f64>,

    /// Expected number of customers waiting in queue
    pub lq: QueueValue,

    /// Expected wait in queue, in the caller's reporting time unit
    pub wq: QueueValue,
}

impl QueueMetrics {
    pub fn is_stable(&self) -> bool {
        self.utilization < 1.0
    }
}

/// Validated M/M/c parameters
///
/// # Example
/// ```
/// use atm_queue_core_rs::queueing::MmcModel;
///
/// // 15 customers/hour, one ATM serving 20/hour, waits reported in minutes
/// let model = MmcModel::new(15.0, 20.0, 1).unwrap();
/// let metrics = model.metrics(60.0).unwrap();
///
/// assert_eq!(metrics.utilization, 0.75);
/// assert!((metrics.lq.finite().unwrap() - 2.25).abs() < 1e-12);
/// assert!((metrics.wq.finite().unwrap() - 9.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmcModel {
    arrival_rate: f64,
    service_rate: f64,
    servers: u32,
}

impl MmcModel {
    /// Create a model from λ, μ (per server) and c
    ///
    /// # Errors
    /// `InvalidParameter` if λ or μ is not a positive finite number, or c < 1.
    pub fn new(arrival_rate: f64, service_rate: f64, servers: u32) -> Result<Self, QueueModelError> {
        positive("arrival_rate", arrival_rate)?;
        positive("service_rate", service_rate)?;
        if servers < 1 {
            return Err(QueueModelError::InvalidParameter {
                name: "servers",
                value: servers as f64,
                reason: "must be a positive integer",
            });
        }
        Ok(Self {
            arrival_rate,
            service_rate,
            servers,
        })
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// ρ = λ / (c·μ)
    pub fn utilization(&self) -> f64 {
        self.arrival_rate / (self.servers as f64 * self.service_rate)
    }

    /// Compute steady-state metrics
    ///
    /// `time_scale` converts `Lq / λ` into the reporting unit, e.g. 60.0
    /// when rates are per hour and waits are reported in minutes.
    ///
    /// # Errors
    /// `InvalidParameter` if `time_scale` is not a positive finite number.
    pub fn metrics(&self, time_scale: f64) -> Result<QueueMetrics, QueueModelError> {
        positive("time_scale", time_scale)?;

        let rho = self.utilization();
        if rho >= 1.0 {
            return Ok(QueueMetrics {
                utilization: rho,
                idle_probability: None,
                wait_probability: None,
                lq: QueueValue::Divergent,
                wq: QueueValue::Divergent,
            });
        }

        // offered load a = cρ = λ/μ; terms a^n/n! built incrementally
        let offered_load = self.arrival_rate / self.service_rate;
        let mut term = 1.0;
        let mut partial_sum = 0.0;
        for n in 0..self.servers {
            partial_sum += term;
            term *= offered_load / (n as f64 + 1.0);
        }
        // term == a^c / c!
        let tail = term / (1.0 - rho);
        let p0 = 1.0 / (partial_sum + tail);
        let lq = p0 * term * rho / ((1.0 - rho) * (1.0 - rho));
        let wq = lq / self.arrival_rate * time_scale;

        Ok(QueueMetrics {
            utilization: rho,
            idle_probability: Some(p0),
            wait_probability: Some(p0 * tail),
            lq: QueueValue::Finite(lq),
            wq: QueueValue::Finite(wq),
        })
    }
}

/// One-shot helper: validate parameters and compute metrics
pub fn mmc_metrics(
    arrival_rate: f64,
    service_rate: f64,
    servers: u32,
    time_scale: f64,
) -> Result<QueueMetrics, QueueModelError> {
    MmcModel::new(arrival_rate, service_rate, servers)?.metrics(time_scale)
}

fn positive(name: &'static str, value: f64) -> Result<(), QueueModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QueueModelError::InvalidParameter {
            name,
            value,
            reason: "must be a positive finite number",
        })
    }
}
