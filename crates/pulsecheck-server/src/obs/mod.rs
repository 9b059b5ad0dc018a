//! Observability: HTTP metrics bundle and default process metrics.
//!
//! Instruments live in `pulsecheck-core`; this module owns the registry
//! wiring for the server and the runtime-collected process lines appended to
//! every `/metrics` snapshot.

pub mod metrics;
pub mod process;
