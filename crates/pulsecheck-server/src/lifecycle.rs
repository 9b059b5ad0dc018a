//! Process lifecycle: shutdown signal handling and the forced-exit watchdog.
//!
//! Starting -> Listening -> ShuttingDown -> Stopped. On SIGTERM/Ctrl-C the
//! server stops accepting connections and drains in-flight requests; a
//! watchdog force-exits with code 1 if the drain outlives the grace window,
//! so an orchestrator never waits on a hung process.

use std::future::Future;
use std::time::Duration;

use crate::app_state::AppState;

/// Resolves when a termination signal arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Graceful-shutdown future handed to `axum::serve`.
///
/// Resolving it stops the accept loop; axum then waits for in-flight
/// connections. The spawned watchdog bounds that wait: once the grace window
/// elapses the process exits 1 immediately.
pub async fn shutdown(state: AppState, grace: Duration) {
    drain_after(shutdown_signal(), state, grace, || std::process::exit(1)).await;
}

/// Drain wiring with the signal and the exit action injected, so tests can
/// drive the state machine without a real SIGTERM or killing the process.
async fn drain_after<S, E>(signal: S, state: AppState, grace: Duration, force_exit: E)
where
    S: Future<Output = ()>,
    E: FnOnce() + Send + 'static,
{
    signal.await;

    tracing::warn!(grace_ms = grace.as_millis() as u64, "termination signal received, draining");
    state.metrics().set_draining();

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::error!("shutdown grace period expired, forcing exit");
        force_exit();
    });
}
