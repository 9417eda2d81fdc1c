use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use hellometer_core::error::{HellometerError, Result};

/// Routes owned by the server itself; the metrics path may not shadow them.
const RESERVED_PATHS: [&str; 3] = ["/api/hello", "/healthz", "/readyz"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HellometerError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.shutdown_grace_ms > 60_000 {
            return Err(HellometerError::BadRequest(
                "server.shutdown_grace_ms must be between 0 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            HellometerError::BadRequest(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(HellometerError::BadRequest(
                "metrics.path must start with '/' and name a route".into(),
            ));
        }
        // a static route only: no captures, wildcards, or empty segments
        for segment in self.path[1..].split('/') {
            if segment.is_empty() {
                return Err(HellometerError::BadRequest(format!(
                    "metrics.path must not contain empty segments or a trailing '/': {}",
                    self.path
                )));
            }
            if segment.contains(|c: char| matches!(c, ':' | '*' | '{' | '}')) {
                return Err(HellometerError::BadRequest(format!(
                    "metrics.path must be a literal path, without ':', '*', or braces: {}",
                    self.path
                )));
            }
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(HellometerError::BadRequest(format!(
                "metrics.path collides with a built-in route: {}",
                self.path
            )));
        }
        Ok(())
    }
}

fn default_metrics_path() -> String {
    "/actuator/prometheus".into()
}
