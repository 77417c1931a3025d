//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use fritter_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_MAX_BODY_SIZE};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `127.0.0.1:3000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `None` (platform data directory, see `Database::new`).
    pub database_path: Option<PathBuf>,

    /// Maximum request body size in bytes.
    /// Env: `MAX_BODY_SIZE`
    /// Default: 64 KiB
    pub max_body_size: usize,

    /// Accept cross-origin requests from anywhere with any headers.
    /// Env: `CORS_PERMISSIVE` (true/false)
    /// Default: `false`
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([127, 0, 0, 1], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(val) = lookup("MAX_BODY_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_body_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_BODY_SIZE, using default"),
            }
        }

        if let Some(val) = lookup("CORS_PERMISSIVE") {
            config.cors_permissive = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}
