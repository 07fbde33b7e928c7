//! Tests for the M/M/c analytical model
//!
//! Covers the M/M/1 reduction, divergence for ρ ≥ 1, monotonicity in λ
//! and parameter validation.

use atm_queue_core_rs::{mmc_metrics, MmcModel, QueueModelError, QueueValue};

fn finite(value: QueueValue) -> f64 {
    value.finite().expect("expected a finite value")
}

#[test]
fn test_single_server_reduces_to_mm1() {
    for &(lambda, mu) in &[(1.0, 2.0), (15.0, 20.0), (9.0, 10.0), (0.3, 7.5)] {
        let metrics = mmc_metrics(lambda, mu, 1, 1.0).unwrap();
        let rho = lambda / mu;
        let lq = rho * rho / (1.0 - rho);

        assert!((metrics.utilization - rho).abs() < 1e-12);
        assert!((finite(metrics.lq) - lq).abs() < 1e-9 * lq.max(1.0));
        assert!((finite(metrics.wq) - lq / lambda).abs() < 1e-9 * (lq / lambda).max(1.0));
        assert!((metrics.idle_probability.unwrap() - (1.0 - rho)).abs() < 1e-12);
    }
}

#[test]
fn test_wait_scaled_to_minutes() {
    // 15/hour arrivals, 20/hour service: Wq = 0.15 hours = 9 minutes
    let hours = mmc_metrics(15.0, 20.0, 1, 1.0).unwrap();
    let minutes = mmc_metrics(15.0, 20.0, 1, 60.0).unwrap();

    assert!((finite(hours.wq) - 0.15).abs() < 1e-12);
    assert!((finite(minutes.wq) - 9.0).abs() < 1e-9);
    assert_eq!(hours.lq, minutes.lq);
}

#[test]
fn test_three_server_known_values() {
    // λ=40, μ=20, c=3: a=2, ρ=2/3, P0=1/9, Lq=8/9
    let metrics = mmc_metrics(40.0, 20.0, 3, 60.0).unwrap();
    assert!((metrics.idle_probability.unwrap() - 1.0 / 9.0).abs() < 1e-12);
    assert!((finite(metrics.lq) - 8.0 / 9.0).abs() < 1e-12);
    assert!((finite(metrics.wq) - 8.0 / 9.0 / 40.0 * 60.0).abs() < 1e-12);
    assert!((metrics.wait_probability.unwrap() - 4.0 / 9.0).abs() < 1e-12);
}

#[test]
fn test_rho_at_or_above_one_is_divergent() {
    for &(lambda, mu, c) in &[(40.0, 20.0, 2), (20.0, 20.0, 1), (50.0, 20.0, 2), (1000.0, 1.0, 10)] {
        let metrics = mmc_metrics(lambda, mu, c, 60.0).unwrap();
        assert!(metrics.utilization >= 1.0);
        assert_eq!(metrics.lq, QueueValue::Divergent);
        assert_eq!(metrics.wq, QueueValue::Divergent);
        assert!(metrics.lq.finite().is_none());
    }
}

#[test]
fn test_metrics_grow_as_arrivals_approach_capacity() {
    let mu = 20.0;
    let servers = 2;
    let mut previous: Option<(f64, f64)> = None;

    for step in 1..40 {
        let lambda = step as f64;
        let metrics = mmc_metrics(lambda, mu, servers, 60.0).unwrap();
        let (lq, wq) = (finite(metrics.lq), finite(metrics.wq));
        assert!(lq >= 0.0 && wq >= 0.0);

        if let Some((prev_lq, prev_wq)) = previous {
            assert!(lq > prev_lq, "Lq not increasing at λ={}", lambda);
            assert!(wq > prev_wq, "Wq not increasing at λ={}", lambda);
        }
        previous = Some((lq, wq));
    }
}

#[test]
fn test_more_servers_shorter_queue() {
    let two = mmc_metrics(30.0, 20.0, 2, 60.0).unwrap();
    let three = mmc_metrics(30.0, 20.0, 3, 60.0).unwrap();
    assert!(finite(three.wq) < finite(two.wq));
}

#[test]
fn test_invalid_parameters() {
    assert!(matches!(
        MmcModel::new(-1.0, 20.0, 1),
        Err(QueueModelError::InvalidParameter { name: "arrival_rate", .. })
    ));
    assert!(matches!(
        MmcModel::new(10.0, 0.0, 1),
        Err(QueueModelError::InvalidParameter { name: "service_rate", .. })
    ));
    assert!(matches!(
        MmcModel::new(10.0, 20.0, 0),
        Err(QueueModelError::InvalidParameter { name: "servers", .. })
    ));
    assert!(mmc_metrics(10.0, 20.0, 1, f64::INFINITY).is_err());
}

#[test]
fn test_error_message_names_parameter() {
    let err = MmcModel::new(10.0, 20.0, 0).unwrap_err();
    assert!(err.to_string().contains("servers"));
}
