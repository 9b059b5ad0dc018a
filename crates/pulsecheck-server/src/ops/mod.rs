//! Operational HTTP endpoints and fallback handlers.
//!
//! - `GET /health`   : liveness (status, timestamp, uptime)
//! - `GET /api/info` : static app info + environment
//! - `GET /metrics`  : Prometheus text format
//! - fallback        : 404 JSON with a fixed shape
//! - panic recovery  : 500 JSON, detail logged server-side only

use std::any::Any;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Response, StatusCode};
use axum::response::{IntoResponse, Json};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::app_state::AppState;
use crate::obs::metrics::HttpMetrics;

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": now_rfc3339(),
        "uptime": state.uptime().as_secs_f64(),
    }))
}

pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let app = state.cfg();
    Json(json!({
        "app": app.app.name,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": app.app.environment,
        "instance": app.app.instance,
        "timestamp": now_rfc3339(),
    }))
}

/// Render the full metrics snapshot. A collection failure surfaces as a 500
/// with the error text: this is an operator-facing endpoint, not user-facing,
/// so the message is deliberately not masked.
pub async fn metrics(State(state): State<AppState>) -> Response<Body> {
    match state.collect_stats() {
        Ok(stats) => {
            let body = state.metrics().render_snapshot(&stats);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, HttpMetrics::CONTENT_TYPE)],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "metrics snapshot failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Any unmatched route.
pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource was not found",
        })),
    )
}

/// Panic recovery: log the detail, answer with a fixed generic body. Internal
/// error text must never reach the client.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(%detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "message": "Something went wrong",
        })),
    )
        .into_response()
}
