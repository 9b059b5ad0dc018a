//! Axum router wiring.
//!
//! Routes, static file services, the panic-recovery layer, and the timing
//! middleware (outermost, so it observes the final status of every request,
//! including recovered panics and fallback 404s).

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::{app_state::AppState, ops, telemetry};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(ops::health))
        .route("/api/info", get(ops::info))
        .route("/metrics", get(ops::metrics));

    if let Some(dir) = state.cfg().server.static_dir.clone() {
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        .fallback(ops::fallback)
        .layer(CatchPanicLayer::custom(ops::handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            telemetry::track_http,
        ))
        .with_state(state)
}
