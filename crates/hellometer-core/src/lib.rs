//! Shared building blocks for the hello service.
//!
//! - `protocol::hello`: query parameters, defaults, the `workMs` range check,
//!   and the JSON bodies returned to callers.
//! - `protocol::work`: how long a request sleeps (`workMs` plus jitter).
//! - `error`: the error enum and the client codes it maps to.
//!
//! No HTTP, runtime, or metrics types live here. The server crate decides
//! what a rejection looks like on the wire and when meters are touched.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

pub use error::{HellometerError, Result};
