//! Registry and exposition-format tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use pulsecheck_core::metrics::{Registry, DEFAULT_DURATION_BUCKETS};
use pulsecheck_core::PulseCheckError;

#[test]
fn duplicate_name_rejected() {
    let registry = Registry::new();
    registry
        .register_counter("http_requests_total", "Total requests", &["method"])
        .unwrap();
    let err = registry
        .register_gauge("http_requests_total", "clash", &[])
        .expect_err("must fail");
    assert!(matches!(err, PulseCheckError::DuplicateMetric(name) if name == "http_requests_total"));
}

#[test]
fn empty_name_rejected() {
    let registry = Registry::new();
    let err = registry.register_counter("", "nameless", &[]).expect_err("must fail");
    assert!(matches!(err, PulseCheckError::InvalidMetric(_)));
}

#[test]
fn counter_is_monotonic_and_renders_help_type() {
    let registry = Registry::new();
    let counter = registry
        .register_counter("jobs_total", "Jobs processed", &["kind"])
        .unwrap();

    counter.inc(&["batch"]);
    counter.add(&["batch"], 4);
    assert_eq!(counter.value(&["batch"]), 5);
    assert_eq!(counter.value(&["stream"]), 0);

    let out = registry.render();
    assert!(out.contains("# HELP jobs_total Jobs processed"));
    assert!(out.contains("# TYPE jobs_total counter"));
    assert!(out.contains("jobs_total{kind=\"batch\"} 5"));
}

#[test]
fn gauge_moves_both_ways() {
    let registry = Registry::new();
    let gauge = registry
        .register_gauge("in_flight", "Currently active", &[])
        .unwrap();

    gauge.inc(&[]);
    gauge.inc(&[]);
    gauge.dec(&[]);
    assert_eq!(gauge.value(&[]), 1);

    // No labels: no braces in the rendered line.
    let out = registry.render();
    assert!(out.contains("\nin_flight 1\n"));
}

#[test]
fn histogram_buckets_are_cumulative() {
    let registry = Registry::new();
    let hist = registry
        .register_histogram(
            "req_duration_seconds",
            "Request duration",
            &["route"],
            &DEFAULT_DURATION_BUCKETS,
        )
        .unwrap();

    // 3ms falls into the first bucket (le=0.005) and every bucket above it.
    hist.observe(&["/health"], Duration::from_millis(3));
    for i in 0..DEFAULT_DURATION_BUCKETS.len() {
        assert_eq!(hist.bucket_count(&["/health"], i), 1, "bucket {i}");
    }

    // 300ms skips buckets below 0.5s.
    hist.observe(&["/health"], Duration::from_millis(300));
    assert_eq!(hist.bucket_count(&["/health"], 0), 1); // le=0.005
    assert_eq!(hist.bucket_count(&["/health"], 6), 2); // le=0.5
    assert_eq!(hist.count(&["/health"]), 2);

    let out = registry.render();
    assert!(out.contains("# TYPE req_duration_seconds histogram"));
    assert!(out.contains("req_duration_seconds_bucket{route=\"/health\",le=\"0.005\"} 1"));
    assert!(out.contains("req_duration_seconds_bucket{route=\"/health\",le=\"+Inf\"} 2"));
    assert!(out.contains("req_duration_seconds_count{route=\"/health\"} 2"));
}

#[test]
fn histogram_counts_never_decrease() {
    let registry = Registry::new();
    let hist = registry
        .register_histogram("d", "durations", &[], &DEFAULT_DURATION_BUCKETS)
        .unwrap();

    let mut last = vec![0u64; DEFAULT_DURATION_BUCKETS.len()];
    for ms in [1u64, 50, 700, 2, 9000] {
        hist.observe(&[], Duration::from_millis(ms));
        for (i, prev) in last.iter_mut().enumerate() {
            let now = hist.bucket_count(&[], i);
            assert!(now >= *prev, "bucket {i} decreased");
            *prev = now;
        }
    }
    assert_eq!(hist.count(&[]), 5);
}

#[test]
fn bad_bucket_bounds_rejected() {
    let registry = Registry::new();
    assert!(matches!(
        registry.register_histogram("h1", "x", &[], &[]),
        Err(PulseCheckError::InvalidMetric(_))
    ));
    assert!(matches!(
        registry.register_histogram("h2", "x", &[], &[0.1, 0.1, 0.5]),
        Err(PulseCheckError::InvalidMetric(_))
    ));
}

#[test]
fn label_values_are_escaped() {
    let registry = Registry::new();
    let counter = registry
        .register_counter("odd_labels_total", "Escaping", &["path"])
        .unwrap();
    counter.inc(&["a\"b\\c\nd"]);

    let out = registry.render();
    assert!(out.contains("odd_labels_total{path=\"a\\\"b\\\\c\\nd\"} 1"));
}

#[test]
fn render_preserves_registration_order() {
    let registry = Registry::new();
    registry.register_counter("first_total", "a", &[]).unwrap();
    registry.register_gauge("second", "b", &[]).unwrap();

    let out = registry.render();
    let first = out.find("# TYPE first_total counter").unwrap();
    let second = out.find("# TYPE second gauge").unwrap();
    assert!(first < second);
}
