//! Application settings loaded via OrthoConfig.
//!
//! Values come from `LEDGER_*` environment variables, an optional config
//! file, and command-line flags. Leaving `remote_url` unset runs the server
//! against the in-process fixtures.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::remote::RemoteServiceConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STUDENTS_TABLE: &str = "students";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}'")]
    BindAddr { value: String },
    /// `remote_url` is not an absolute URL.
    #[error("invalid remote url '{value}': {reason}")]
    RemoteUrl { value: String, reason: String },
    /// A remote URL was configured without its API key.
    #[error("LEDGER_REMOTE_API_KEY is required when LEDGER_REMOTE_URL is set")]
    MissingApiKey,
    /// The table name cannot be used as a path segment.
    #[error("invalid students table name '{value}'")]
    TableName { value: String },
    /// A zero timeout would fail every request.
    #[error("remote_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Server and remote service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEDGER")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Base URL of the hosted data and auth service.
    pub remote_url: Option<String>,
    /// Public API key sent with every remote call.
    pub remote_api_key: Option<String>,
    /// Per-request timeout for remote calls, in seconds.
    pub remote_timeout_secs: Option<u64>,
    /// Remote table holding student records.
    pub students_table: Option<String>,
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Configured table name, falling back to `students`.
    pub fn students_table(&self) -> Result<&str, SettingsError> {
        let raw = self
            .students_table
            .as_deref()
            .unwrap_or(DEFAULT_STUDENTS_TABLE);
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(raw)
        } else {
            Err(SettingsError::TableName {
                value: raw.to_owned(),
            })
        }
    }

    /// Per-request timeout for remote calls.
    pub fn remote_timeout(&self) -> Result<Duration, SettingsError> {
        match self.remote_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Remote connection settings, or `None` to use the fixtures.
    pub fn remote_service(&self) -> Result<Option<RemoteServiceConfig>, SettingsError> {
        let Some(raw_url) = self.remote_url.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw_url.is_empty() {
            return Ok(None);
        }
        let base_url = Url::parse(raw_url).map_err(|err| SettingsError::RemoteUrl {
            value: raw_url.to_owned(),
            reason: err.to_string(),
        })?;
        let api_key = self
            .remote_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)?;
        Ok(Some(RemoteServiceConfig::new(
            base_url,
            api_key,
            self.remote_timeout()?,
        )))
    }
}
