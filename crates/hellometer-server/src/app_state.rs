//! Shared application state for the hellometer server.
//!
//! Builds the metrics registry, registers every meter, and wires the hello
//! handler to the business meters. Startup errors (a duplicate meter name,
//! for instance) come back as `Result` so main can exit cleanly.

use std::sync::Arc;
use std::time::Instant;

use hellometer_core::error::Result;

use crate::api::HelloHandler;
use crate::config::ServerConfig;
use crate::obs::business::BusinessMeters;
use crate::obs::http::{HTTP_REQUESTS_HELP, HTTP_REQUESTS_TIMER};
use crate::obs::metrics::{MetricsRegistry, TimerOpts, TimerVec};
use crate::shutdown::Shutdown;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    registry: MetricsRegistry,
    meters: BusinessMeters,
    http_requests: Arc<TimerVec>,
    hello: HelloHandler,
    shutdown: Shutdown,
    started: Instant,
}

impl AppState {
    /// Build application state with a fresh shutdown signal.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        Self::with_shutdown(cfg, Shutdown::new())
    }

    pub fn with_shutdown(cfg: ServerConfig, shutdown: Shutdown) -> Result<Self> {
        let registry = MetricsRegistry::new();

        // 1) Business meters, before anything can serve a request
        let meters = BusinessMeters::register(&registry)?;

        // 2) Server request timing
        let http_requests = registry.register_timer_vec(
            HTTP_REQUESTS_TIMER,
            HTTP_REQUESTS_HELP,
            &TimerOpts::default(),
        )?;

        let hello = HelloHandler::new(&meters, shutdown.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                meters,
                http_requests,
                hello,
                shutdown,
                started: Instant::now(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.inner.registry
    }

    pub fn meters(&self) -> &BusinessMeters {
        &self.inner.meters
    }

    pub fn http_requests(&self) -> &TimerVec {
        &self.inner.http_requests
    }

    pub fn hello(&self) -> &HelloHandler {
        &self.inner.hello
    }

    pub fn shutdown(&self) -> Shutdown {
        self.inner.shutdown.clone()
    }

    /// Draining starts as soon as the shutdown signal is raised.
    pub fn is_draining(&self) -> bool {
        self.inner.shutdown.is_triggered()
    }

    /// Process-level gauges appended to every scrape.
    pub fn metrics_extra(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("process_uptime_seconds", self.inner.started.elapsed().as_secs_f64()),
            ("app_draining", if self.is_draining() { 1.0 } else { 0.0 }),
        ]
    }
}
