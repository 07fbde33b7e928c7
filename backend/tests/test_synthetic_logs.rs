//! Tests for synthetic log generation and simulator/model agreement

use atm_queue_core_rs::analysis::compare_with_model;
use atm_queue_core_rs::{
    generate_log, mmc_metrics, order_records, ChannelAssignment, Period, SyntheticLogConfig, WaitingTimeSimulator,
};

#[test]
fn test_generated_log_is_reproducible() {
    let config = SyntheticLogConfig {
        seed: 2024,
        count: 300,
        downtime_probability: 0.1,
        ..SyntheticLogConfig::default()
    };
    let a = generate_log(&config).unwrap();
    let b = generate_log(&config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a[0].id(), "tx_000000");
}

#[test]
fn test_generated_log_is_already_ordered() {
    let log = generate_log(&SyntheticLogConfig { count: 500, ..Default::default() }).unwrap();
    let ordered = order_records(log.clone()).unwrap();
    assert_eq!(log, ordered);
}

#[test]
fn test_generated_rows_have_all_columns() {
    let config = SyntheticLogConfig {
        count: 400,
        downtime_probability: 0.3,
        ..Default::default()
    };
    let log = generate_log(&config).unwrap();

    for record in &log {
        assert!(record.timing().is_ok());
        assert!(record.timestamp().is_ok());
        assert!(config.transaction_types.iter().any(|t| t == record.transaction_type()));
        assert!(record.period().is_some());
        assert_eq!(record.downtime_event(), record.downtime_duration_min().unwrap() > 0.0);
    }
    assert!(log.iter().any(|r| r.downtime_event()));
}

#[test]
fn test_peak_period_follows_clock() {
    let config = SyntheticLogConfig {
        count: 300,
        start_time: "10:00".to_string(),
        peak_hours: (11, 12),
        ..Default::default()
    };
    for record in generate_log(&config).unwrap() {
        let hour = record.timestamp().unwrap().format("%H").to_string();
        let expected = if hour == "11" { Period::Peak } else { Period::OffPeak };
        assert_eq!(record.period(), Some(expected));
    }
}

#[test]
fn test_observed_queue_matches_replay() {
    // The logged queue length is zero exactly when the replayed wait is zero
    let log = generate_log(&SyntheticLogConfig { count: 1000, ..Default::default() }).unwrap();
    let annotated = WaitingTimeSimulator::new(ChannelAssignment::Single)
        .unwrap()
        .run(&log)
        .unwrap();
    for record in &annotated {
        assert_eq!(record.record.queue_length() == 0, record.waiting_time_min == 0.0);
    }
}

#[test]
fn test_simulated_wait_close_to_mm1_formula() {
    let config = SyntheticLogConfig {
        seed: 7,
        count: 100_000,
        arrival_rate_per_hour: 15.0,
        service_rate_per_hour: 20.0,
        ..Default::default()
    };
    let log = generate_log(&config).unwrap();
    let annotated = WaitingTimeSimulator::new(ChannelAssignment::Single)
        .unwrap()
        .run(&log)
        .unwrap();

    let expected = mmc_metrics(15.0, 20.0, 1, 60.0).unwrap().wq.finite().unwrap();
    let comparison = compare_with_model(&annotated, 1, 60.0).unwrap();

    let relative = (comparison.simulated_mean_wait_min - expected).abs() / expected;
    assert!(relative < 0.2, "simulated {} vs analytical {}", comparison.simulated_mean_wait_min, expected);
    assert!((comparison.utilization - 0.75).abs() < 0.03);
}
