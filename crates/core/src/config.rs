//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup (from environment variables in the
//! binary) and then passed into services. Nothing in this crate reads the process
//! environment while handling a request.

use crate::constants::{
    ACCESS_TOKEN_TTL_HOURS, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, REFRESH_TOKEN_TTL_HOURS,
};
use crate::{HmsError, HmsResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone)]
pub struct CoreConfig {
    token_secret: String,
    request_timeout: Duration,
    access_token_ttl: chrono::Duration,
    refresh_token_ttl: chrono::Duration,
    data_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the default token lifetimes.
    ///
    /// # Errors
    ///
    /// Returns `HmsError::InvalidInput` if the token secret is blank or the timeout is zero.
    pub fn new(
        token_secret: String,
        request_timeout: Duration,
        data_dir: Option<PathBuf>,
    ) -> HmsResult<Self> {
        if token_secret.trim().is_empty() {
            return Err(HmsError::InvalidInput(
                "token secret cannot be empty".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(HmsError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            token_secret,
            request_timeout,
            access_token_ttl: chrono::Duration::hours(ACCESS_TOKEN_TTL_HOURS),
            refresh_token_ttl: chrono::Duration::hours(REFRESH_TOKEN_TTL_HOURS),
            data_dir,
        })
    }

    /// Override the access and refresh token lifetimes.
    pub fn with_token_ttls(
        mut self,
        access_token_ttl: chrono::Duration,
        refresh_token_ttl: chrono::Duration,
    ) -> Self {
        self.access_token_ttl = access_token_ttl;
        self.refresh_token_ttl = refresh_token_ttl;
        self
    }

    pub fn token_secret(&self) -> &[u8] {
        self.token_secret.as_bytes()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        self.refresh_token_ttl
    }

    /// Root of the sharded JSON store, or `None` for the in-memory store.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("token_secret", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the listen port from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PORT`].
pub fn port_from_env_value(value: Option<String>) -> HmsResult<u16> {
    match non_blank(value) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v
            .parse::<u16>()
            .map_err(|e| HmsError::InvalidInput(format!("invalid PORT '{}': {}", v, e))),
    }
}

/// Parse the per-request timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_REQUEST_TIMEOUT_SECS`].
pub fn request_timeout_from_env_value(value: Option<String>) -> HmsResult<Duration> {
    let secs = match non_blank(value) {
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
        Some(v) => v.parse::<u64>().map_err(|e| {
            HmsError::InvalidInput(format!("invalid REQUEST_TIMEOUT_SECS '{}': {}", v, e))
        })?,
    };
    Ok(Duration::from_secs(secs))
}

/// Resolve the optional data directory; blank values select the in-memory store.
pub fn data_dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}
