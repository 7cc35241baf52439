//! Relay Configuration
//!
//! Built once at startup and shared read-only with every request:
//! - Upstream API key (optional at startup, required per request)
//! - Upstream base URL
//! - Outbound timeout
//! - Inbound body size limit

use crate::generation::DEFAULT_UPSTREAM_BASE;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the upstream API key
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";
/// Environment variable overriding the upstream base URL
pub const UPSTREAM_BASE_ENV: &str = "GOOGLE_AI_API_BASE";
/// Environment variable setting the outbound timeout in seconds
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
/// Environment variable setting the inbound body limit in bytes
pub const MAX_BODY_BYTES_ENV: &str = "RELAY_MAX_BODY_BYTES";

/// Default inbound body limit (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Upstream API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for an empty or whitespace-only key
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Raw key, only for placing into the outbound query string
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ApiKey(REDACTED)")
    }
}

/// Complete relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream API key; absence is reported per request
    pub api_key: Option<ApiKey>,
    /// Upstream base URL, without trailing model path
    pub upstream_base: String,
    /// Outbound request timeout (None = client default)
    pub upstream_timeout: Option<Duration>,
    /// Maximum accepted inbound body size
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
            upstream_timeout: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RelayConfig {
    /// Read configuration from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            api_key: std::env::var(API_KEY_ENV).ok().and_then(ApiKey::new),
            ..Self::default()
        };

        if let Ok(base) = std::env::var(UPSTREAM_BASE_ENV) {
            if !base.trim().is_empty() {
                config.upstream_base = base.trim().to_string();
            }
        }

        if let Some(secs) = parse_env::<u64>(UPSTREAM_TIMEOUT_ENV)? {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: UPSTREAM_TIMEOUT_ENV,
                    value: secs.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.upstream_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(bytes) = parse_env::<usize>(MAX_BODY_BYTES_ENV)? {
            config.max_body_bytes = bytes;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    pub fn with_upstream_base(mut self, base: impl Into<String>) -> Self {
        self.upstream_base = base.into();
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                name,
                value: raw,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}
