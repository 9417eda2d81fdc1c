//! Lightweight in-process metrics.
//!
//! Meters are stored as atomics and rendered by the scrape handler in
//! Prometheus text format. `business` owns the two demo instruments, `http`
//! times every request that passes through the router.

pub mod business;
pub mod http;
pub mod metrics;
