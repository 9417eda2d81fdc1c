//! hellometer server library entry.
//!
//! Wires config, the metrics registry, the hello handler, and the ops routes
//! into one axum application. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod shutdown;
