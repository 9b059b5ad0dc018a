//! HTTP metrics bundle for the server.
//!
//! Owns the process-wide `Registry` plus typed handles for the request
//! instruments the timing middleware records into. One instance is built at
//! startup and shared through `AppState`; there is no global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pulsecheck_core::error::Result;
use pulsecheck_core::metrics::{
    CounterVec, GaugeVec, HistogramVec, Registry, DEFAULT_DURATION_BUCKETS,
    EXPOSITION_CONTENT_TYPE,
};

use crate::obs::process::{self, ProcessStats};

pub struct HttpMetrics {
    registry: Registry,
    pub requests_total: Arc<CounterVec>,
    pub request_duration_seconds: Arc<HistogramVec>,
    pub requests_in_flight: Arc<GaugeVec>,
    draining: AtomicBool,
}

impl HttpMetrics {
    /// Content type for `/metrics` responses.
    pub const CONTENT_TYPE: &'static str = EXPOSITION_CONTENT_TYPE;

    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests_total = registry.register_counter(
            "http_requests_total",
            "Total number of HTTP requests",
            &["method", "route", "status"],
        )?;
        let request_duration_seconds = registry.register_histogram(
            "http_request_duration_seconds",
            "Duration of HTTP requests in seconds",
            &["method", "route", "status"],
            &DEFAULT_DURATION_BUCKETS,
        )?;
        let requests_in_flight = registry.register_gauge(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
            &[],
        )?;
        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
            draining: AtomicBool::new(false),
        })
    }

    /// Mark draining state (shutdown signal received).
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered instruments plus the runtime-collected process
    /// lines and the draining gauge.
    pub fn render_snapshot(&self, stats: &ProcessStats) -> String {
        let mut out = self.registry.render();
        process::render_into(&mut out, stats);
        out.push_str("# TYPE pulsecheck_draining gauge\n");
        out.push_str(if self.is_draining() {
            "pulsecheck_draining 1\n"
        } else {
            "pulsecheck_draining 0\n"
        });
        out
    }
}
