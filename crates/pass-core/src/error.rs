//! Error types for PASS Core
//!
//! Provides error handling for:
//! - Remote store failures (conflicts, missing resources, remote messages)
//! - Form validation
//! - Upload orchestration
//! - Message sending and listing
//! - Configuration and telemetry setup

use pass_acl::AclError;
use pass_graph::GraphError;

/// Main PASS error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Remote store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Submitted form is incomplete
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Upload could not start
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Message operation failed
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// Identity could not be resolved
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Configuration failed
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Graph construction or parsing failed
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Access-control graph failed
    #[error("acl error: {0}")]
    Acl(#[from] AclError),
}

impl CoreError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Message(MessageError::Store(e)) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Remote store errors
///
/// Display text is the remote message, surfaced to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Create-only write hit an existing resource
    #[error("resource already exists: {0}")]
    Conflict(String),

    /// Resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Caller lacks the needed access mode
    #[error("access denied: {0}")]
    Forbidden(String),

    /// Any other failure reported by the store
    #[error("{0}")]
    Remote(String),

    /// Store gave up waiting
    #[error("request timed out")]
    Timeout,

    /// Stored graph could not be read
    #[error("malformed graph: {0}")]
    Graph(#[from] GraphError),

    /// Stored access-control graph could not be read
    #[error("malformed acl: {0}")]
    Acl(#[from] AclError),
}

impl StoreError {
    /// Create-only write found an existing resource
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Resource was not there
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Timeout)
    }
}

/// Form validation failures
///
/// Display text is the user-facing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Cross-pod upload without a username
    #[error("Username not provided")]
    MissingUsername,

    /// No file selected
    #[error("missing file")]
    MissingFile,
}

/// Errors that prevent an upload from starting
///
/// Failures after an upload has started are reported through
/// [`crate::upload::UpsertOutcome`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Another submission from the same form is still running
    #[error("an upload is already in progress")]
    InFlight,

    /// Illegal upload state transition
    #[error("illegal upload state transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: crate::state::UploadState,
        /// Requested state
        to: crate::state::UploadState,
    },
}

/// Identity resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No active session
    #[error("not logged in")]
    NotLoggedIn,

    /// Username is empty or not a valid host label
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    /// Identity URL has no `profile` segment to derive a Pod from
    #[error("cannot derive pod from identity: {0}")]
    UnsupportedIdentity(String),

    /// Derived URL failed validation
    #[error("invalid url: {0}")]
    Graph(#[from] GraphError),
}

/// Message send/list errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// Recipient or sender could not be resolved
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Envelope could not be built
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds unusable values
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Tracing subscriber could not be installed
    #[error("failed to initialize tracing: {0}")]
    Telemetry(String),
}
