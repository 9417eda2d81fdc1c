//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use hellometer_core::error::{HellometerError, Result};

pub use schema::{MetricsSection, ServerConfig, ServerSection};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "HELLOMETER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "hellometer.yaml";

/// Resolve the config path from the environment, falling back to the default.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load config from `path`. A missing file yields the built-in defaults.
pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            let cfg = ServerConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(HellometerError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| HellometerError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
