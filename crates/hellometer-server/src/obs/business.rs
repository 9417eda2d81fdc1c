//! Business meters driven by the hello endpoint.
//!
//! Both are registered once while the app state is built and then shared by
//! `Arc` for the lifetime of the process. Nothing re-registers or resets them.

use std::sync::Arc;
use std::time::Duration;

use hellometer_core::error::Result;

use super::metrics::{Counter, MetricsRegistry, Timer, TimerOpts};

pub const EVENTS_COUNTER: &str = "app_business_events_total";
pub const OPERATION_TIMER: &str = "app_business_operation_seconds";

const EVENTS_HELP: &str = "Example custom counter for business events";
const OPERATION_HELP: &str = "Example custom timer for a simulated business operation";

/// Fixed SLO boundaries of the operation timer.
pub const OPERATION_SLOS_MS: [u64; 5] = [10, 50, 100, 250, 500];

pub fn create_counter(registry: &MetricsRegistry) -> Result<Arc<Counter>> {
    registry.register_counter(EVENTS_COUNTER, EVENTS_HELP)
}

pub fn create_timer(registry: &MetricsRegistry) -> Result<Arc<Timer>> {
    let opts = TimerOpts::default()
        .percentile_histogram()
        .slos(OPERATION_SLOS_MS.iter().map(|ms| Duration::from_millis(*ms)));
    registry.register_timer(OPERATION_TIMER, OPERATION_HELP, &opts)
}

/// Handles to the registered business meters.
#[derive(Clone)]
pub struct BusinessMeters {
    pub events: Arc<Counter>,
    pub operation: Arc<Timer>,
}

impl BusinessMeters {
    pub fn register(registry: &MetricsRegistry) -> Result<Self> {
        Ok(Self {
            events: create_counter(registry)?,
            operation: create_timer(registry)?,
        })
    }
}
