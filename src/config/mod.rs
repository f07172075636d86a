//! Configuration module for the TYTC backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default path prefix all service routes are nested under.
pub const DEFAULT_SERVICE_PREFIX: &str = "/make-server-0d02a0b5";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Static bearer token for API authentication (required in production)
    pub api_token: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Path prefix for the service routes, e.g. `/make-server-0d02a0b5`
    pub service_prefix: String,
    /// Re-check required fields and email shape on join requests
    pub validate_submissions: bool,
    /// Degrade read failures to empty/zero results instead of a 500
    pub read_fail_open: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_token = env::var("TYTC_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let db_path = env::var("TYTC_DB_PATH")
            .unwrap_or_else(|_| "./data/tytc.sqlite".to_string())
            .into();

        let bind_addr = env::var("TYTC_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid TYTC_BIND_ADDR format");

        let log_level = env::var("TYTC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("TYTC_LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::from_str(&s))
            .unwrap_or(LogFormat::Pretty);

        let service_prefix = normalize_prefix(
            &env::var("TYTC_SERVICE_PREFIX").unwrap_or_else(|_| DEFAULT_SERVICE_PREFIX.to_string()),
        );

        let validate_submissions = env_flag("TYTC_VALIDATE_SUBMISSIONS", true);
        let read_fail_open = env_flag("TYTC_READ_FAIL_OPEN", true);

        Self {
            api_token,
            db_path,
            bind_addr,
            log_level,
            log_format,
            service_prefix,
            validate_submissions,
            read_fail_open,
        }
    }
}

/// Parse a boolean environment variable, falling back to `default` when unset or unparsable.
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                tracing::warn!("Invalid {} value {:?}, using default {}", key, other, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Normalize a route prefix to `/segment` form. An empty result means "mount at root".
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
