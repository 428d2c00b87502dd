//! Environment-driven application configuration.

use std::env;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::Key;
use tracing::warn;

use crate::outbound::googlebooks::DEFAULT_ENDPOINT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "reviews.db";
const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration assembled from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket the HTTP server binds to (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// SQLite database path (`DATABASE_URL`).
    pub database_url: String,
    /// Metadata service endpoint (`GOOGLE_BOOKS_ENDPOINT`).
    pub metadata_endpoint: String,
    /// Per-request metadata timeout (`METADATA_TIMEOUT_SECS`).
    pub metadata_timeout: Duration,
    /// Whether the session cookie carries the `Secure` attribute
    /// (`SESSION_COOKIE_SECURE`, on unless set to `0`).
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> io::Result<Self> {
        let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e| io::Error::other(format!("invalid BIND_ADDR {raw_addr}: {e}")))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let metadata_endpoint =
            env::var("GOOGLE_BOOKS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into());

        let metadata_timeout = match env::var("METADATA_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    io::Error::other(format!("invalid METADATA_TIMEOUT_SECS {raw}: {e}"))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_METADATA_TIMEOUT_SECS),
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            database_url,
            metadata_endpoint,
            metadata_timeout,
            cookie_secure,
        })
    }
}

/// Load the session signing key from `SESSION_KEY_FILE`.
///
/// Debug builds (or `SESSION_ALLOW_EPHEMERAL=1`) fall back to a generated
/// key so local development works without secrets; release builds refuse to
/// start without one.
pub fn load_session_key() -> io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}
