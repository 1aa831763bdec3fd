//! HTTP server configuration.
//!
//! Loaded from a JSON file (`ledgerdesk.json` by default); every field has
//! a default so a missing file still boots a dev server.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Bootstrap admin account, created at startup if absent.
///
/// This replaces the hard-coded demo credentials older versions of the app
/// shipped with: the operator opts in, explicitly, per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means permissive (development)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Opaque session lifetime in hours (default: 24)
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Minimum password length enforced at signup and password change
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    /// Optional admin account seeded at startup
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_password_min_length() -> usize {
    6
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            session_ttl_hours: default_session_ttl_hours(),
            password_min_length: default_password_min_length(),
            bootstrap_admin: None,
        }
    }
}

impl HttpConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
