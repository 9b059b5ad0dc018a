//! Top-level facade crate for pulsecheck.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use pulsecheck_core::*;
}

pub mod server {
    pub use pulsecheck_server::*;
}
