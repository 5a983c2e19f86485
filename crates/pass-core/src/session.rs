//! Login session state
//!
//! [`SessionState`] is the single owner of what the UI previously kept in
//! browser-local globals: whether the user is logged in, which OIDC issuer
//! they logged in with, their identity, and where to return after login.

use pass_graph::ResourceUrl;
use parking_lot::RwLock;

#[derive(Debug, Clone, Default)]
struct Inner {
    logged_in: bool,
    issuer: Option<ResourceUrl>,
    identity: Option<ResourceUrl>,
    restore_path: Option<String>,
}

/// Shared, thread-safe session state
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Inner>,
}

impl SessionState {
    /// Logged-out state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed login
    pub fn on_login(&self, issuer: ResourceUrl, identity: ResourceUrl) {
        let mut inner = self.inner.write();
        tracing::debug!(issuer = %issuer, identity = %identity, "session started");
        inner.logged_in = true;
        inner.issuer = Some(issuer);
        inner.identity = Some(identity);
    }

    /// Forget everything about the session
    pub fn on_logout(&self) {
        *self.inner.write() = Inner::default();
        tracing::debug!("session cleared");
    }

    /// Whether a login is active
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.read().logged_in
    }

    /// Issuer of the active login
    #[must_use]
    pub fn issuer(&self) -> Option<ResourceUrl> {
        self.inner.read().issuer.clone()
    }

    /// Identity of the active login
    #[must_use]
    pub fn identity(&self) -> Option<ResourceUrl> {
        self.inner.read().identity.clone()
    }

    /// Remember where to go once login completes
    pub fn set_restore_path(&self, path: impl Into<String>) {
        self.inner.write().restore_path = Some(path.into());
    }

    /// Take the remembered path, clearing it
    pub fn take_restore_path(&self) -> Option<String> {
        self.inner.write().restore_path.take()
    }
}
