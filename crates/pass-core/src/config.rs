//! PASS configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! pass_root = "PASS"
//! inbox = "inbox"
//! outbox = "outbox"
//! clear_delay_ms = 3000
//! public_access = { read = true, append = false, write = false, control = false }
//!
//! [notifications]
//! uploading_secs = 3
//!
//! [logging]
//! filter = "pass_core=debug"
//! json = true
//! ```

use crate::error::ConfigError;
use pass_acl::Access;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Top-level container holding everything PASS stores
    pub pass_root: String,
    /// Container receiving messages, under the root
    pub inbox: String,
    /// Container keeping copies of sent messages, under the root
    pub outbox: String,
    /// Metadata document name inside each document container
    pub metadata_file: String,
    /// Delay before form fields are cleared after a failure
    pub clear_delay_ms: u64,
    /// How long each status message stays up
    pub notifications: NotificationConfig,
    /// Access granted to the uploading identity
    pub owner_access: Access,
    /// Access granted to the public on upload; `None` grants nothing
    pub public_access: Option<Access>,
    /// Tracing setup
    pub logging: LoggingConfig,
}

impl PassConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different root container name
    #[inline]
    #[must_use]
    pub fn with_pass_root(mut self, root: impl Into<String>) -> Self {
        self.pass_root = root.into();
        self
    }

    /// With a different failure clear delay
    #[inline]
    #[must_use]
    pub fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With public access granted on upload
    #[inline]
    #[must_use]
    pub fn with_public_access(mut self, access: Access) -> Self {
        self.public_access = Some(access);
        self
    }

    /// With different owner access
    #[inline]
    #[must_use]
    pub fn with_owner_access(mut self, access: Access) -> Self {
        self.owner_access = access;
        self
    }

    /// With different notification durations
    #[inline]
    #[must_use]
    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Failure clear delay as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for invalid TOML, [`ConfigError::Invalid`] for
    /// blank or nested container names
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`PassConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check container names
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pass_root", &self.pass_root),
            ("inbox", &self.inbox),
            ("outbox", &self.outbox),
            ("metadata_file", &self.metadata_file),
        ] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be a single non-empty path segment, got {value:?}"
                )));
            }
        }
        if self.inbox == self.outbox {
            return Err(ConfigError::Invalid("inbox and outbox must differ".to_string()));
        }
        Ok(())
    }
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            pass_root: "PASS".to_string(),
            inbox: "inbox".to_string(),
            outbox: "outbox".to_string(),
            metadata_file: "document.ttl".to_string(),
            clear_delay_ms: 3000,
            notifications: NotificationConfig::default(),
            owner_access: Access::FULL,
            public_access: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Seconds each status message stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// `Uploading "<name>" to Pod...`
    pub uploading_secs: u64,
    /// `Updating contents in Pod...`
    pub updating_secs: u64,
    /// Success messages
    pub success_secs: u64,
    /// `Operation failed. Reason: ...` and validation failures
    pub failure_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            uploading_secs: 3,
            updating_secs: 3,
            success_secs: 5,
            failure_secs: 5,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Include span/event targets
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}
