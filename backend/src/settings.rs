//! Process settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BLOG_*` environment variables and config
//! files. Numeric knobs carry OrthoConfig defaults; accessors fill in the
//! optional text fields. Token signing
//! and cookie policy are not here: they are secrets or security toggles and
//! are read by [`crate::inbound::http::auth_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_TOKEN_TTL_MINUTES;
use crate::outbound::mail::SmtpSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SMTP_HOST: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 1025;
const DEFAULT_EMAIL_FROM: &str = "noreply@marketplace-blog.com";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Settings shared by the API server and the email worker.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
    /// Access token lifetime in minutes.
    #[ortho_config(default = 30)]
    pub token_ttl_minutes: i64,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[ortho_config(default = 1025)]
    pub smtp_port: u16,
    /// Sender address for outgoing email.
    pub email_from: Option<String>,
    /// Worker sleep between empty polls, in milliseconds.
    #[ortho_config(default = 1000)]
    pub worker_poll_interval_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            email_from: None,
            worker_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Settings that parse but make no sense.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {0}")]
    TokenTtl(i64),
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] for unparsable values.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// Returns [`SettingsError::TokenTtl`] for values outside
    /// `1..=MAX_TOKEN_TTL_MINUTES`.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let minutes = self.token_ttl_minutes;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
            return Err(SettingsError::TokenTtl(minutes));
        }
        chrono::Duration::try_minutes(minutes).ok_or(SettingsError::TokenTtl(minutes))
    }

    pub fn smtp(&self) -> SmtpSettings {
        SmtpSettings {
            host: self
                .smtp_host
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
            port: self.smtp_port,
            from: self
                .email_from
                .clone()
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_owned()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_interval_ms)
    }
}
