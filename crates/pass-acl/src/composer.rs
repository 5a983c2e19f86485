//! Grant composition
//!
//! [`AccessControlComposer`] applies grants in a fixed order:
//!
//! 1. identity at the resource
//! 2. identity at the container default
//! 3. if requested, the public at the resource, then at the container default
//!
//! Identity grants replace what was there. Public grants only ever add
//! capabilities, and are never produced unless asked for.

use crate::access::Access;
use crate::graph::{AccessControlGraph, Agent, Scope};
use pass_graph::ResourceUrl;

/// Pure composer of access-control graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControlComposer;

impl AccessControlComposer {
    /// Create a composer
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Grant `access` to `identity` at both scopes, then optional public access
    #[must_use]
    pub fn compose(
        &self,
        mut acl: AccessControlGraph,
        identity: &ResourceUrl,
        access: Access,
        public: Option<Access>,
    ) -> AccessControlGraph {
        let agent = Agent::Identity(identity.clone());
        acl.set(agent.clone(), Scope::Resource, access);
        acl.set(agent, Scope::ContainerDefault, access);
        match public {
            Some(public) => self.grant_public(acl, public),
            None => acl,
        }
    }

    /// Add public access at both scopes, leaving identity grants untouched
    #[must_use]
    pub fn grant_public(&self, mut acl: AccessControlGraph, access: Access) -> AccessControlGraph {
        for scope in [Scope::Resource, Scope::ContainerDefault] {
            let merged = acl.access(&Agent::Public, scope) | access;
            acl.set(Agent::Public, scope, merged);
        }
        acl
    }
}
