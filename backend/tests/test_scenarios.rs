//! Tests for the scenario comparison table
//!
//! The three-way split (ρ > 1 divergent, ρ = 1 boundary, ρ < 1 formula)
//! and its labels are part of the report contract.

use atm_queue_core_rs::queueing::{default_scenarios, BOUNDARY_LABEL, DIVERGENT_LABEL};
use atm_queue_core_rs::{mmc_metrics, ScenarioEvaluator, ScenarioOutcome, ScenarioParameters};

fn evaluator() -> ScenarioEvaluator {
    ScenarioEvaluator::new(60.0).unwrap()
}

#[test]
fn test_boundary_scenario_uses_boundary_labels() {
    let row = evaluator()
        .evaluate_one(&ScenarioParameters::new("Peak, 2 ATMs", 40.0, 20.0, 2))
        .unwrap();

    assert_eq!(row.utilization, 1.0);
    assert_eq!(row.outcome, ScenarioOutcome::Boundary);
    assert_eq!(row.wq(), None);
    assert_eq!(row.lq(), None);
    assert_eq!(row.wq_label(2), BOUNDARY_LABEL);
    assert_eq!(row.lq_label(2), BOUNDARY_LABEL);
    assert_ne!(row.wq_label(2), DIVERGENT_LABEL);
}

#[test]
fn test_overloaded_scenario_is_divergent() {
    let row = evaluator()
        .evaluate_one(&ScenarioParameters::new("Overload", 50.0, 20.0, 2))
        .unwrap();

    assert_eq!(row.utilization, 1.25);
    assert_eq!(row.outcome, ScenarioOutcome::Divergent);
    assert_eq!(row.wq_label(2), DIVERGENT_LABEL);
}

#[test]
fn test_stable_scenario_matches_model() {
    let row = evaluator()
        .evaluate_one(&ScenarioParameters::new("Peak, 3 ATMs", 40.0, 20.0, 3))
        .unwrap();
    let metrics = mmc_metrics(40.0, 20.0, 3, 60.0).unwrap();

    assert_eq!(row.wq(), metrics.wq.finite());
    assert_eq!(row.lq(), metrics.lq.finite());
}

#[test]
fn test_rows_preserve_input_order() {
    let scenarios = vec![
        ScenarioParameters::new("c", 10.0, 20.0, 1),
        ScenarioParameters::new("a", 50.0, 20.0, 1),
        ScenarioParameters::new("b", 40.0, 20.0, 2),
    ];
    let rows = evaluator().evaluate(&scenarios).unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["c", "a", "b"]);
}

#[test]
fn test_default_scenarios_cover_all_outcomes() {
    let rows = evaluator().evaluate(&default_scenarios()).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(matches!(rows[0].outcome, ScenarioOutcome::Stable { .. }));
    assert_eq!(rows[1].outcome, ScenarioOutcome::Divergent);
    assert_eq!(rows[2].outcome, ScenarioOutcome::Boundary);
    assert!(matches!(rows[3].outcome, ScenarioOutcome::Stable { .. }));
    assert!(matches!(rows[4].outcome, ScenarioOutcome::Stable { .. }));
}

#[test]
fn test_values_kept_at_full_precision() {
    // Wq = 4/3 minutes, not representable at two decimals
    let row = evaluator()
        .evaluate_one(&ScenarioParameters::new("Peak, 3 ATMs", 40.0, 20.0, 3))
        .unwrap();
    let wq = row.wq().unwrap();
    assert!((wq - 4.0 / 3.0).abs() < 1e-12);
    assert_eq!(row.wq_label(2), "1.33");
}

#[test]
fn test_outcome_json_shape() {
    let rows = evaluator()
        .evaluate(&[
            ScenarioParameters::new("stable", 15.0, 20.0, 1),
            ScenarioParameters::new("boundary", 40.0, 20.0, 2),
        ])
        .unwrap();
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["outcome"]["outcome"], "Stable");
    assert_eq!(json[1]["outcome"]["outcome"], "Boundary");
}
