//! Shared application state for the pulsecheck server.
//!
//! Built once at startup from validated config; cheap to clone (everything
//! behind one `Arc`). Startup errors are explicit so `main` can handle them.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use pulsecheck_core::error::Result;

use crate::config::ServiceConfig;
use crate::obs::metrics::HttpMetrics;
use crate::obs::process::ProcessStats;

/// Source of runtime process readings for `/metrics`. Injectable so tests
/// can exercise the collection-failure path.
pub type StatsSource = Arc<dyn Fn(f64, SystemTime) -> Result<ProcessStats> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    metrics: Arc<HttpMetrics>,
    stats_source: StatsSource,
    started: Instant,
    started_at: SystemTime,
}

impl AppState {
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        Self::with_stats_source(cfg, Arc::new(ProcessStats::collect))
    }

    /// Build state with a custom stats source.
    pub fn with_stats_source(cfg: ServiceConfig, stats_source: StatsSource) -> Result<Self> {
        let metrics = Arc::new(HttpMetrics::new()?);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics,
                stats_source,
                started: Instant::now(),
                started_at: SystemTime::now(),
            }),
        })
    }

    /// Collect current process readings through the configured source.
    pub fn collect_stats(&self) -> Result<ProcessStats> {
        (self.inner.stats_source)(self.uptime().as_secs_f64(), self.inner.started_at)
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Time elapsed since the state was built (process uptime).
    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }
}
