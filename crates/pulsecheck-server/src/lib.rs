//! pulsecheck server library entry.
//!
//! This crate wires the config layer, HTTP metrics, request-timing middleware,
//! route handlers, and process lifecycle into a small operations demo service.
//! It is intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod router;
pub mod telemetry;
