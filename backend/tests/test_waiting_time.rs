//! Tests for the single-channel waiting-time recurrence

use atm_queue_core_rs::{
    AnnotatedRecord, ChannelAssignment, SimulationError, TransactionRecord, WaitingTimeSimulator,
};

/// Helper to build records from parallel columns
fn records(arrivals: &[f64], services: &[f64], downtimes: &[f64]) -> Vec<TransactionRecord> {
    arrivals
        .iter()
        .zip(services)
        .zip(downtimes)
        .enumerate()
        .map(|(i, ((&a, &s), &d))| TransactionRecord::new(a, s, d).with_id(format!("r{}", i)))
        .collect()
}

fn single() -> WaitingTimeSimulator {
    WaitingTimeSimulator::new(ChannelAssignment::Single).unwrap()
}

fn starts(out: &[AnnotatedRecord]) -> Vec<f64> {
    out.iter().map(|r| r.service_start_min).collect()
}

fn waits(out: &[AnnotatedRecord]) -> Vec<f64> {
    out.iter().map(|r| r.waiting_time_min).collect()
}

#[test]
fn test_three_record_example() {
    let input = records(&[0.0, 2.0, 3.0], &[5.0, 1.0, 1.0], &[0.0, 0.0, 0.0]);
    let out = single().run(&input).unwrap();

    assert_eq!(starts(&out), vec![0.0, 5.0, 6.0]);
    assert_eq!(waits(&out), vec![0.0, 3.0, 3.0]);
}

#[test]
fn test_first_record_never_waits() {
    let input = records(&[7.5], &[3.0], &[10.0]);
    let out = single().run(&input).unwrap();
    assert_eq!(out[0].service_start_min, 7.5);
    assert_eq!(out[0].waiting_time_min, 0.0);
}

#[test]
fn test_downtime_delays_next_customer() {
    let input = records(&[0.0, 1.0, 2.0], &[1.0, 1.0, 1.0], &[4.0, 0.0, 0.0]);
    let out = single().run(&input).unwrap();
    assert_eq!(starts(&out), vec![0.0, 5.0, 6.0]);
    assert_eq!(waits(&out), vec![0.0, 4.0, 4.0]);
}

#[test]
fn test_output_keeps_input_order_and_ids() {
    let input = records(&[0.0, 1.0, 2.0, 3.0], &[2.0; 4], &[0.0; 4]);
    let out = single().run(&input).unwrap();

    let ids: Vec<&str> = out.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["r0", "r1", "r2", "r3"]);
    assert!(out.iter().all(|r| r.channel == "ATM-1"));
    assert_eq!(out[2].record, input[2]);
}

#[test]
fn test_simulation_is_idempotent() {
    let input = records(
        &[0.0, 0.5, 0.7, 4.0, 4.0, 9.0],
        &[2.0, 1.5, 0.2, 3.0, 1.0, 0.5],
        &[0.0, 1.0, 0.0, 0.0, 2.5, 0.0],
    );
    let first = single().run(&input).unwrap();
    let second = single().run(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_start_is_later_of_arrival_and_previous_finish() {
    let input = records(
        &[0.0, 1.0, 10.0, 10.5],
        &[3.0, 3.0, 1.0, 1.0],
        &[0.0, 0.5, 0.0, 0.0],
    );
    let out = single().run(&input).unwrap();

    for i in 1..out.len() {
        let prev = &out[i - 1];
        let prev_finish = prev.service_start_min
            + prev.record.service_time_min().unwrap()
            + prev.record.downtime_duration_min().unwrap();
        let arrival = out[i].record.arrival_time_min().unwrap();
        assert_eq!(out[i].service_start_min, arrival.max(prev_finish));
    }
}

#[test]
fn test_unsorted_arrivals_are_an_invariant_violation() {
    let input = records(&[5.0, 1.0], &[1.0, 1.0], &[0.0, 0.0]);
    let result = single().run(&input);
    assert!(
        matches!(result, Err(SimulationError::InvariantViolation(_))),
        "expected InvariantViolation, got {:?}",
        result
    );
}

#[test]
fn test_missing_service_time_aborts_run() {
    let mut input = records(&[0.0, 1.0, 2.0], &[1.0; 3], &[0.0; 3]);
    input[1] = input[1].clone().with_service(None);

    assert_eq!(
        single().run(&input),
        Err(SimulationError::MissingField {
            record_id: "r1".to_string(),
            field: "service_time_min",
        })
    );
}

#[test]
fn test_missing_downtime_aborts_run() {
    let input = vec![TransactionRecord::empty()
        .with_id("x")
        .with_arrival(Some(0.0))
        .with_service(Some(1.0))];
    assert!(matches!(
        single().run(&input),
        Err(SimulationError::MissingField {
            field: "downtime_duration_min",
            ..
        })
    ));
}

#[test]
fn test_negative_service_time_is_rejected() {
    let input = records(&[0.0, 1.0], &[-3.0, 1.0], &[0.0, 0.0]);
    assert!(matches!(
        single().run(&input),
        Err(SimulationError::InvariantViolation(_))
    ));
}
