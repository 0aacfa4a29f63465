//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.
//! The asset manifest and cache generation tag are compile-time constants in
//! [`crate::shell`] and deliberately absent here.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Result, ShellError};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origin the shell fronts and caches for
    pub upstream_origin: String,
    /// Upstream fetch timeout in seconds
    pub fetch_timeout: u64,
    /// Step sequencer tick length in milliseconds
    pub jam_step_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_ORIGIN` - Origin to front (default: http://127.0.0.1:8080)
    /// - `FETCH_TIMEOUT` - Upstream timeout in seconds (default: 10)
    /// - `JAM_STEP_MS` - Sequencer step in milliseconds (default: 250)
    ///
    /// Unparsable values, and zero for the two durations, keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).and_then(|v| v.parse::<u64>().ok());
        Self {
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_origin: lookup("UPSTREAM_ORIGIN").unwrap_or(defaults.upstream_origin),
            fetch_timeout: parse("FETCH_TIMEOUT")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.fetch_timeout),
            jam_step_ms: parse("JAM_STEP_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.jam_step_ms),
        }
    }

    /// Parses the upstream origin, keeping only scheme, host and port.
    pub fn origin(&self) -> Result<Url> {
        let url = Url::parse(&self.upstream_origin).map_err(|e| {
            ShellError::InvalidRequest(format!(
                "UPSTREAM_ORIGIN '{}' is not a valid URL: {}",
                self.upstream_origin, e
            ))
        })?;
        if !url.origin().is_tuple() {
            return Err(ShellError::InvalidRequest(format!(
                "UPSTREAM_ORIGIN '{}' has no usable origin",
                self.upstream_origin
            )));
        }
        Url::parse(&url.origin().ascii_serialization())
            .map_err(|e| ShellError::Internal(e.to_string()))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn jam_step(&self) -> Duration {
        Duration::from_millis(self.jam_step_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_origin: "http://127.0.0.1:8080".to_string(),
            fetch_timeout: 10,
            jam_step_ms: 250,
        }
    }
}
