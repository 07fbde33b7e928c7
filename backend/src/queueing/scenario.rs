//! What-if scenario comparison
//!
//! Applies the M/M/c model to an ordered list of named parameter sets and
//! produces one row per scenario, in input order. Rows fall into exactly
//! one of three outcomes:
//!
//! - ρ > 1: divergent, the queue grows without bound
//! - ρ = 1: boundary, reported with a fixed descriptive label
//! - ρ < 1: stable, numeric `Wq`/`Lq` from the closed form
//!
//! The boundary label is a documented approximation. The Erlang-C formula
//! has no finite limit at ρ = 1; the row describes what the operations
//! team observes instead of a derived value.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::mmc::{MmcModel, QueueModelError, QueueValue};

/// Label used for both `Wq` and `Lq` of a ρ = 1 scenario
pub const BOUNDARY_LABEL: &str = "Queue grows, but bounded in practice";

/// Label used for both `Wq` and `Lq` of a ρ > 1 scenario
pub const DIVERGENT_LABEL: &str = "Infinite (unstable)";

/// Absolute tolerance on ρ for treating it as exactly 1
const BOUNDARY_TOLERANCE: f64 = 1e-12;

/// One named what-if configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub label: String,

    /// λ, customers per time unit
    pub arrival_rate: f64,

    /// μ per server, customers per time unit
    pub service_rate: f64,

    /// c, number of ATMs
    pub servers: u32,
}

impl ScenarioParameters {
    pub fn new(label: impl Into<String>, arrival_rate: f64, service_rate: f64, servers: u32) -> Self {
        Self {
            label: label.into(),
            arrival_rate,
            service_rate,
            servers,
        }
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum ScenarioOutcome {
    Stable { wq: f64, lq: f64 },
    Boundary,
    Divergent,
}

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub label: String,
    pub arrival_rate: f64,
    pub service_rate: f64,
    pub servers: u32,
    pub utilization: f64,
    pub outcome: ScenarioOutcome,
}

impl ScenarioRow {
    pub fn wq(&self) -> Option<f64> {
        match self.outcome {
            ScenarioOutcome::Stable { wq, .. } => Some(wq),
            _ => None,
        }
    }

    pub fn lq(&self) -> Option<f64> {
        match self.outcome {
            ScenarioOutcome::Stable { lq, .. } => Some(lq),
            _ => None,
        }
    }

    /// Display text for `Wq`, rounded to `decimals` when numeric
    pub fn wq_label(&self, decimals: usize) -> String {
        self.value_label(self.wq(), decimals)
    }

    /// Display text for `Lq`, rounded to `decimals` when numeric
    pub fn lq_label(&self, decimals: usize) -> String {
        self.value_label(self.lq(), decimals)
    }

    fn value_label(&self, value: Option<f64>, decimals: usize) -> String {
        match (self.outcome, value) {
            (ScenarioOutcome::Boundary, _) => BOUNDARY_LABEL.to_string(),
            (ScenarioOutcome::Divergent, _) => DIVERGENT_LABEL.to_string(),
            (ScenarioOutcome::Stable { .. }, Some(v)) => format!("{:.*}", decimals, v),
            (ScenarioOutcome::Stable { .. }, None) => String::new(),
        }
    }
}

/// Evaluates scenario lists against the M/M/c model
///
/// # Example
/// ```
/// use atm_queue_core_rs::queueing::{ScenarioEvaluator, ScenarioOutcome, ScenarioParameters};
///
/// let evaluator = ScenarioEvaluator::new(60.0).unwrap();
/// let rows = evaluator
///     .evaluate(&[
///         ScenarioParameters::new("Peak, 2 ATMs", 40.0, 20.0, 2),
///         ScenarioParameters::new("Peak, 3 ATMs", 40.0, 20.0, 3),
///     ])
///     .unwrap();
///
/// assert_eq!(rows[0].outcome, ScenarioOutcome::Boundary);
/// assert!(rows[1].wq().unwrap() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioEvaluator {
    time_scale: f64,
}

impl ScenarioEvaluator {
    /// # Errors
    /// `InvalidParameter` if `time_scale` is not a positive finite number.
    pub fn new(time_scale: f64) -> Result<Self, QueueModelError> {
        if !(time_scale.is_finite() && time_scale > 0.0) {
            return Err(QueueModelError::InvalidParameter {
                name: "time_scale",
                value: time_scale,
                reason: "must be a positive finite number",
            });
        }
        Ok(Self { time_scale })
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Evaluate every scenario, preserving input order
    ///
    /// # Errors
    /// The first scenario with invalid parameters aborts the whole table.
    pub fn evaluate(&self, scenarios: &[ScenarioParameters]) -> Result<Vec<ScenarioRow>, QueueModelError> {
        scenarios.iter().map(|s| self.evaluate_one(s)).collect()
    }

    pub fn evaluate_one(&self, scenario: &ScenarioParameters) -> Result<ScenarioRow, QueueModelError> {
        let model = MmcModel::new(scenario.arrival_rate, scenario.service_rate, scenario.servers)?;
        let rho = model.utilization();

        let outcome = if (rho - 1.0).abs() <= BOUNDARY_TOLERANCE {
            ScenarioOutcome::Boundary
        } else if rho > 1.0 {
            ScenarioOutcome::Divergent
        } else {
            let metrics = model.metrics(self.time_scale)?;
            match (metrics.wq, metrics.lq) {
                (QueueValue::Finite(wq), QueueValue::Finite(lq)) => ScenarioOutcome::Stable { wq, lq },
                _ => ScenarioOutcome::Divergent,
            }
        };

        match outcome {
            ScenarioOutcome::Divergent => warn!(
                "Scenario '{}' is unstable (rho = {:.3})",
                scenario.label, rho
            ),
            _ => debug!("Scenario '{}': rho = {:.3}, {:?}", scenario.label, rho, outcome),
        }

        Ok(ScenarioRow {
            label: scenario.label.clone(),
            arrival_rate: scenario.arrival_rate,
            service_rate: scenario.service_rate,
            servers: scenario.servers,
            utilization: rho,
            outcome,
        })
    }
}

/// The ATM staffing scenarios used in the standard report (rates per hour)
pub fn default_scenarios() -> Vec<ScenarioParameters> {
    vec![
        ScenarioParameters::new("Off-peak, 1 ATM", 15.0, 20.0, 1),
        ScenarioParameters::new("Peak, 1 ATM", 40.0, 20.0, 1),
        ScenarioParameters::new("Peak, 2 ATMs", 40.0, 20.0, 2),
        ScenarioParameters::new("Peak, 3 ATMs", 40.0, 20.0, 3),
        ScenarioParameters::new("Off-peak, 2 ATMs", 15.0, 20.0, 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_for_each_outcome() {
        let evaluator = ScenarioEvaluator::new(60.0).unwrap();
        let rows = evaluator.evaluate(&default_scenarios()).unwrap();

        assert_eq!(rows[0].wq_label(2), "9.00");
        assert_eq!(rows[0].lq_label(2), "2.25");
        assert_eq!(rows[1].wq_label(2), DIVERGENT_LABEL);
        assert_eq!(rows[2].wq_label(2), BOUNDARY_LABEL);
        assert_eq!(rows[2].lq_label(2), BOUNDARY_LABEL);
    }

    #[test]
    fn test_invalid_scenario_aborts_table() {
        let evaluator = ScenarioEvaluator::new(60.0).unwrap();
        let result = evaluator.evaluate(&[
            ScenarioParameters::new("ok", 10.0, 20.0, 1),
            ScenarioParameters::new("no ATMs", 10.0, 20.0, 0),
        ]);
        assert!(matches!(
            result,
            Err(QueueModelError::InvalidParameter { name: "servers", .. })
        ));
    }

    #[test]
    fn test_zero_time_scale_rejected() {
        assert!(ScenarioEvaluator::new(0.0).is_err());
    }
}
