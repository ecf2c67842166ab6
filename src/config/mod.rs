//! Configuration module for BookShare.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Which data backend the gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Hosted PostgREST-style backend
    Remote {
        url: String,
        api_key: String,
        /// Bearer token of the signed-in user; the anon key is used when absent
        access_token: Option<String>,
    },
    /// Embedded SQLite database for local development
    Local {
        db_path: PathBuf,
        /// Identity recorded as `uploaded_by` for new books
        user_id: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data backend selection
    pub backend: BackendConfig,
    /// Address to bind the UI surface to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Upper bound for a single backend request
    pub request_timeout: Duration,
    /// How long a successful submission stays on screen before returning to browse
    pub success_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let backend = match env::var("BOOKSHARE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "remote" => BackendConfig::Remote {
                url: required("BOOKSHARE_BACKEND_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                api_key: required("BOOKSHARE_BACKEND_KEY")?,
                access_token: env::var("BOOKSHARE_ACCESS_TOKEN").ok(),
            },
            "local" => BackendConfig::Local {
                db_path: env::var("BOOKSHARE_DB_PATH")
                    .unwrap_or_else(|_| "./data/bookshare.sqlite".to_string())
                    .into(),
                user_id: env::var("BOOKSHARE_LOCAL_USER")
                    .unwrap_or_else(|_| "local-user".to_string()),
            },
            other => {
                return Err(AppError::Config(format!(
                    "Invalid BOOKSHARE_BACKEND '{}': expected 'remote' or 'local'",
                    other
                )))
            }
        };

        let bind_addr = env::var("BOOKSHARE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| AppError::Config("Invalid BOOKSHARE_BIND_ADDR format".to_string()))?;

        let log_level = env::var("BOOKSHARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let request_timeout =
            Duration::from_secs(parse_number("BOOKSHARE_REQUEST_TIMEOUT_SECS", 15)?);
        let success_delay =
            Duration::from_millis(parse_number("BOOKSHARE_SUCCESS_DELAY_MS", 2000)?);

        Ok(Self {
            backend,
            bind_addr,
            log_level,
            request_timeout,
            success_delay,
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} must be set for the remote backend", key)))
}

fn parse_number(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a non-negative integer", key))),
        Err(_) => Ok(default),
    }
}
