//! PyO3 entry points
//!
//! # Example (from Python)
//!
//! ```python
//! from atm_queue_core_rs import annotate_waiting_times, evaluate_scenarios
//!
//! rows = evaluate_scenarios([
//!     {"label": "Peak, 2 ATMs", "arrival_rate": 40, "service_rate": 20, "servers": 2},
//! ])
//! annotated = annotate_waiting_times(df.to_dict("records"), channels=2)
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{annotated_to_py, parse_record, parse_scenario, scenario_row_to_py};
use crate::queueing::ScenarioEvaluator;
use crate::simulation::{annotate_waiting_times as annotate, ChannelAssignment, SimulationError};

/// Evaluate a list of scenario dicts, preserving order
///
/// # Errors
/// Raises ValueError for missing keys or invalid λ / μ / c.
#[pyfunction]
#[pyo3(signature = (scenarios, time_scale = 60.0))]
pub fn evaluate_scenarios(py: Python<'_>, scenarios: &Bound<'_, PyList>, time_scale: f64) -> PyResult<Py<PyList>> {
    let parsed = scenarios
        .iter()
        .map(|item| parse_scenario(item.downcast::<PyDict>()?))
        .collect::<PyResult<Vec<_>>>()?;

    let rows = ScenarioEvaluator::new(time_scale)
        .and_then(|evaluator| evaluator.evaluate(&parsed))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let out = PyList::empty_bound(py);
    for row in &rows {
        out.append(scenario_row_to_py(py, row)?)?;
    }
    Ok(out.unbind())
}

/// Order log rows and annotate them with service start and waiting time
///
/// `channels` > 1 selects round-robin assignment; `by_server` groups rows
/// by their `server_id` instead.
///
/// # Errors
/// Raises ValueError for missing fields or bad parameters, RuntimeError
/// for invariant violations in the log.
#[pyfunction]
#[pyo3(signature = (records, channels = 1, by_server = false))]
pub fn annotate_waiting_times(
    py: Python<'_>,
    records: &Bound<'_, PyList>,
    channels: usize,
    by_server: bool,
) -> PyResult<Py<PyList>> {
    let parsed = records
        .iter()
        .map(|item| parse_record(item.downcast::<PyDict>()?))
        .collect::<PyResult<Vec<_>>>()?;

    let assignment = if by_server {
        ChannelAssignment::ByServerId
    } else if channels == 1 {
        ChannelAssignment::Single
    } else {
        ChannelAssignment::RoundRobin { channels }
    };

    let annotated = annotate(parsed, &assignment).map_err(|e| match e {
        SimulationError::InvariantViolation(_) => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    })?;

    let out = PyList::empty_bound(py);
    for record in &annotated {
        out.append(annotated_to_py(py, record)?)?;
    }
    Ok(out.unbind())
}
