//! pulsecheck server binary.
//!
//! - Health/info/metrics endpoints over axum
//! - Request-duration and request-count middleware
//! - Graceful shutdown on SIGTERM/Ctrl-C with a bounded grace window

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use pulsecheck_server::{app_state, config, lifecycle, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Config (strict parsing + env overrides, validated on load)
    let cfg = config::load().expect("config load failed");
    let listen = cfg.server.listen_addr().expect("server.listen must be a valid socket address");
    let grace = Duration::from_millis(cfg.server.shutdown_grace_ms);

    let state = app_state::AppState::new(cfg).expect("app state init failed");
    let app = router::build_router(state.clone());

    tracing::info!(%listen, version = env!("CARGO_PKG_VERSION"), "pulsecheck-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(lifecycle::shutdown(state, grace))
        .await
        .expect("server failed");

    tracing::info!("server stopped cleanly");
}
