//! Identity and Pod location
//!
//! Usernames map to Pods hosted by the same provider as the logged-in
//! user: `https://<username>.<issuer host>/`.

use crate::error::{IdentityError, StoreError};
use crate::session::SessionState;
use crate::store::RemoteStore;
use once_cell::sync::Lazy;
use pass_graph::vocab::foaf;
use pass_graph::{GraphParser, ResourceUrl};
use regex::Regex;
use std::fmt::Debug;
use std::sync::Arc;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_-]*[A-Za-z0-9])?$").expect("valid username regex"));

/// Opaque authenticated request capability
///
/// Passed through to store implementations; never inspected here beyond
/// the identity it acts for.
pub trait AuthenticatedFetch: Send + Sync + Debug {
    /// Identity the fetch authenticates as, if logged in
    fn agent_identity(&self) -> Option<ResourceUrl>;
}

/// Resolves identities and Pod locations
pub trait IdentityResolver: Send + Sync + Debug {
    /// Identity of the logged-in user
    ///
    /// # Errors
    /// [`IdentityError::NotLoggedIn`] without an active session
    fn own_identity(&self) -> Result<ResourceUrl, IdentityError>;

    /// Root of the logged-in user's Pod
    ///
    /// # Errors
    /// As [`IdentityResolver::own_identity`], or
    /// [`IdentityError::UnsupportedIdentity`]
    fn own_pod_url(&self) -> Result<ResourceUrl, IdentityError>;

    /// Root of another user's Pod at the same provider
    ///
    /// # Errors
    /// [`IdentityError::InvalidUsername`] or [`IdentityError::NotLoggedIn`]
    fn pod_url_for(&self, username: &str) -> Result<ResourceUrl, IdentityError>;
}

/// Resolver backed by the login session's OIDC issuer
#[derive(Debug, Clone)]
pub struct OidcIssuerResolver {
    session: Arc<SessionState>,
}

impl OidcIssuerResolver {
    /// Resolve against `session`
    #[inline]
    #[must_use]
    pub fn new(session: Arc<SessionState>) -> Self {
        Self { session }
    }
}

impl IdentityResolver for OidcIssuerResolver {
    fn own_identity(&self) -> Result<ResourceUrl, IdentityError> {
        self.session.identity().ok_or(IdentityError::NotLoggedIn)
    }

    fn own_pod_url(&self) -> Result<ResourceUrl, IdentityError> {
        let identity = self.own_identity()?;
        let doc = identity.without_fragment();
        let origin_len = identity.scheme().len() + "//".len() + identity.host().len();
        // only the path is searched; hosts may contain "profile"
        let root_len = doc
            .get(origin_len..)
            .and_then(|path| path.find("/profile/"))
            .map(|idx| origin_len + idx + 1)
            .ok_or_else(|| IdentityError::UnsupportedIdentity(identity.to_string()))?;
        Ok(ResourceUrl::parse(&doc[..root_len])?)
    }

    fn pod_url_for(&self, username: &str) -> Result<ResourceUrl, IdentityError> {
        let username = username.trim();
        if !USERNAME_RE.is_match(username) {
            return Err(IdentityError::InvalidUsername(username.to_string()));
        }
        let issuer = self.session.issuer().ok_or(IdentityError::NotLoggedIn)?;
        Ok(ResourceUrl::parse(format!(
            "{}//{}.{}/",
            issuer.scheme(),
            username,
            issuer.host()
        ))?)
    }
}

/// Display name from an identity's profile document
///
/// Reads `foaf:name` of the identity subject, falling back to the first
/// subject in the profile that has one. `None` when no name is recorded.
///
/// # Errors
/// Propagates store failures
pub async fn profile_name(
    store: &dyn RemoteStore,
    identity: &ResourceUrl,
) -> Result<Option<String>, StoreError> {
    let profile = ResourceUrl::parse(identity.without_fragment())?;
    let triples = store.read_graph(&profile).await?;
    let parser = GraphParser::new(&triples);

    let name = parser
        .subject(identity.as_str())
        .and_then(|s| s.string(foaf::NAME))
        .or_else(|| {
            parser
                .subjects()
                .into_iter()
                .filter_map(|subject| parser.subject(subject))
                .find_map(|s| s.string(foaf::NAME))
        });
    Ok(name.map(str::to_string))
}
