//! Shared error type across pulsecheck crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, PulseCheckError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PulseCheckError {
    /// A metric with this name is already registered.
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    /// Instrument definition rejected (empty name, bad bucket bounds, ...).
    #[error("invalid metric definition: {0}")]
    InvalidMetric(String),
    /// Configuration failed to parse or validate.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}
