//! Single dependency for embedding hellometer.
//!
//! `contract` holds the request/response and error types; `service` builds
//! and runs the HTTP application around them.

pub use hellometer_core as contract;
pub use hellometer_server as service;

pub use hellometer_core::protocol::hello::{HelloQuery, HelloResponse};
pub use hellometer_core::{HellometerError, Result};
pub use hellometer_server::{app_state::AppState, router::build_router};
