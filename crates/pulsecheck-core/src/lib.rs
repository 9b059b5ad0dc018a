//! pulsecheck core: metrics instruments, registry, and the shared error type.
//!
//! This crate defines the in-process metrics model (counters, gauges,
//! histograms, and the registry that renders them in the Prometheus text
//! exposition format) shared by the server and by tooling. It intentionally
//! carries no HTTP or runtime dependencies so it can be reused in multiple
//! contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `PulseCheckError`/`Result` so production
//! processes do not crash on bad instrument definitions or render calls.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{PulseCheckError, Result};
