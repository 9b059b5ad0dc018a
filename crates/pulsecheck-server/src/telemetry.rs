//! Request timing middleware.
//!
//! Wraps every request: bumps the in-flight gauge on entry, and on completion
//! records the duration histogram and request counter labeled by
//! `{method, route, status}`. Observation happens after the handler yields
//! its response; it never delays or blocks the response itself.
//!
//! Route label: the matched route pattern (`MatchedPath`), so metric
//! cardinality stays bounded by the registered routes. Requests that match no
//! route are bucketed under a single `unmatched` label rather than the raw
//! path, which would let arbitrary 404 traffic grow the registry without
//! bound.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;
use crate::obs::metrics::HttpMetrics;

/// Route label for requests that resolved to no registered route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Status label recorded when the request future is dropped before a response
/// exists (client went away mid-request).
const CLIENT_ABORT_STATUS: &str = "499";

pub async fn track_http(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let timer = RequestTimer::start(state.metrics(), method, route);
    let response = next.run(req).await;
    timer.complete(response.status().as_u16());
    response
}

/// Per-request completion guard.
///
/// Records exactly once: either explicitly via `complete` with the real
/// status, or from `Drop` with status 499 if the request future was cancelled.
/// Either way the in-flight gauge is decremented, so it cannot leak.
struct RequestTimer {
    metrics: Arc<HttpMetrics>,
    started: Instant,
    method: String,
    route: String,
    done: bool,
}

impl RequestTimer {
    fn start(metrics: Arc<HttpMetrics>, method: String, route: Option<String>) -> Self {
        metrics.requests_in_flight.inc(&[]);
        Self {
            metrics,
            started: Instant::now(),
            method,
            route: route.unwrap_or_else(|| UNMATCHED_ROUTE.to_string()),
            done: false,
        }
    }

    fn complete(mut self, status: u16) {
        self.record(&status.to_string());
    }

    fn record(&mut self, status: &str) {
        if self.done {
            return;
        }
        self.done = true;

        let labels = [self.method.as_str(), self.route.as_str(), status];
        self.metrics
            .request_duration_seconds
            .observe(&labels, self.started.elapsed());
        self.metrics.requests_total.inc(&labels);
        self.metrics.requests_in_flight.dec(&[]);
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.record(CLIENT_ABORT_STATUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[allow(clippy::unwrap_used)]
    fn metrics() -> Arc<HttpMetrics> {
        Arc::new(HttpMetrics::new().unwrap())
    }

    #[test]
    fn complete_records_once_and_clears_in_flight() {
        let m = metrics();
        let timer = RequestTimer::start(Arc::clone(&m), "GET".into(), Some("/health".into()));
        assert_eq!(m.requests_in_flight.value(&[]), 1);

        timer.complete(200);
        assert_eq!(m.requests_in_flight.value(&[]), 0);
        assert_eq!(m.requests_total.value(&["GET", "/health", "200"]), 1);
        // Drop after complete must not double-count.
        assert_eq!(m.request_duration_seconds.count(&["GET", "/health", "200"]), 1);
    }

    #[test]
    fn dropped_timer_counts_as_client_abort() {
        let m = metrics();
        let timer = RequestTimer::start(Arc::clone(&m), "POST".into(), None);
        drop(timer);

        assert_eq!(m.requests_in_flight.value(&[]), 0);
        assert_eq!(m.requests_total.value(&["POST", UNMATCHED_ROUTE, "499"]), 1);
    }

    #[test]
    fn duration_lands_in_a_cumulative_bucket() {
        let m = metrics();
        let mut timer = RequestTimer::start(Arc::clone(&m), "GET".into(), Some("/x".into()));
        std::thread::sleep(Duration::from_millis(2));
        timer.record("200");

        let labels = ["GET", "/x", "200"];
        assert_eq!(m.request_duration_seconds.count(&labels), 1);
        // 2ms must be visible in the widest bucket.
        let last = pulsecheck_core::metrics::DEFAULT_DURATION_BUCKETS.len() - 1;
        assert_eq!(m.request_duration_seconds.bucket_count(&labels, last), 1);
    }
}
