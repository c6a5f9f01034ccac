//! Publisher configuration.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use notebridge_core::Keys;
use notebridge_relay::DispatchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PublisherError, Result};

/// What to do when mining hits its deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutFallback {
    /// Fail the request.
    #[default]
    Abort,
    /// Publish the event signed before mining, without proof-of-work.
    PublishUnmined,
}

/// Configuration for a [`Publisher`](crate::Publisher).
///
/// Every field has a default, so a config file only needs the secret key:
///
/// ```json
/// { "secret_key": "<64 hex chars>", "relay_timeout_ms": 5000 }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Issuer secret key, hex encoded.
    pub secret_key: Option<String>,
    /// Per-relay send timeout in milliseconds.
    pub relay_timeout_ms: u64,
    /// Mining progress report interval in milliseconds.
    pub progress_interval_ms: u64,
    pub timeout_fallback: TimeoutFallback,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            relay_timeout_ms: 10_000,
            progress_interval_ms: 5_000,
            timeout_fallback: TimeoutFallback::Abort,
        }
    }
}

impl PublisherConfig {
    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_secret_key(mut self, hex: impl Into<String>) -> Self {
        self.secret_key = Some(hex.into());
        self
    }

    /// Load and validate the issuer key.
    pub fn keys(&self) -> Result<Keys> {
        let hex = self
            .secret_key
            .as_deref()
            .ok_or_else(|| PublisherError::Config("no secret key configured".into()))?;
        Ok(Keys::from_secret_hex(hex.trim())?)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            relay_timeout: Duration::from_millis(self.relay_timeout_ms),
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

impl fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("relay_timeout_ms", &self.relay_timeout_ms)
            .field("progress_interval_ms", &self.progress_interval_ms)
            .field("timeout_fallback", &self.timeout_fallback)
            .finish()
    }
}
