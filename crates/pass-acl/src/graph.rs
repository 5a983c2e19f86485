//! Access-control graphs
//!
//! An [`AccessControlGraph`] lists the grants attached to one resource or
//! container. Each grant is keyed by (agent, scope); setting a key twice
//! replaces the earlier grant.

use crate::access::Access;
use crate::error::AclError;
use pass_graph::vocab::{acl, rdf, PUBLIC_AGENT_CLASS};
use pass_graph::{AttributeGraph, ResourceUrl, SubGraph, SubjectRole, TypedValue};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Who a grant applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    /// A specific identity (WebID)
    Identity(ResourceUrl),
    /// Anyone, authenticated or not
    Public,
}

impl Display for Agent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity(url) => write!(f, "{url}"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// What a grant covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The resource itself
    Resource,
    /// Members of the container that have no ACL of their own
    ContainerDefault,
}

/// One entry of an access-control graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Grantee
    pub agent: Agent,
    /// Coverage
    pub scope: Scope,
    /// Granted capabilities
    pub access: Access,
}

/// Grants attached to one resource or container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlGraph {
    resource: ResourceUrl,
    grants: Vec<Grant>,
}

impl AccessControlGraph {
    /// Empty graph for `resource`
    #[inline]
    #[must_use]
    pub fn new(resource: ResourceUrl) -> Self {
        Self {
            resource,
            grants: Vec::new(),
        }
    }

    /// The resource these grants protect
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &ResourceUrl {
        &self.resource
    }

    /// Set the grant for (agent, scope), replacing any earlier one
    pub fn set(&mut self, agent: Agent, scope: Scope, access: Access) {
        match self
            .grants
            .iter_mut()
            .find(|g| g.agent == agent && g.scope == scope)
        {
            Some(existing) => existing.access = access,
            None => self.grants.push(Grant {
                agent,
                scope,
                access,
            }),
        }
    }

    /// Capabilities granted to (agent, scope); [`Access::NONE`] if unset
    #[must_use]
    pub fn access(&self, agent: &Agent, scope: Scope) -> Access {
        self.grants
            .iter()
            .find(|g| &g.agent == agent && g.scope == scope)
            .map_or(Access::NONE, |g| g.access)
    }

    /// Whether any grant names the public
    #[must_use]
    pub fn has_public(&self) -> bool {
        self.grants
            .iter()
            .any(|g| g.agent == Agent::Public && !g.access.is_empty())
    }

    /// Grants in insertion order
    #[inline]
    #[must_use]
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Number of grants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether the graph has no grants
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Export as `acl:Authorization` sub-graphs, one per non-empty grant
    ///
    /// # Errors
    /// Propagates [`AclError::Graph`] if a vocabulary IRI fails URL checks
    pub fn to_attribute_graph(&self) -> Result<AttributeGraph, AclError> {
        let mut graph = AttributeGraph::new();
        for (idx, grant) in self.grants.iter().enumerate() {
            if grant.access.is_empty() {
                continue;
            }
            let mut builder = SubGraph::builder(SubjectRole::named(format!("grant-{idx}"))?)
                .add_url(rdf::TYPE, acl::AUTHORIZATION);
            builder = match grant.scope {
                Scope::Resource => builder.add(acl::ACCESS_TO, self.resource.clone()),
                Scope::ContainerDefault => builder.add(acl::DEFAULT, self.resource.clone()),
            };
            builder = match &grant.agent {
                Agent::Identity(id) => builder.add(acl::AGENT, id.clone()),
                Agent::Public => builder.add_url(acl::AGENT_CLASS, PUBLIC_AGENT_CLASS),
            };
            for mode in grant.access.mode_iris() {
                builder = builder.add_url(acl::MODE, mode);
            }
            graph.set(builder.build()?);
        }
        Ok(graph)
    }

    /// Read grants back from `acl:Authorization` sub-graphs
    ///
    /// Sub-graphs without the authorization type are ignored. Several
    /// authorizations for the same (agent, scope) are merged.
    ///
    /// # Errors
    /// [`AclError`] for an authorization naming another resource, no agent,
    /// no target, an unknown agent class, or an unknown mode
    pub fn from_attribute_graph(resource: ResourceUrl, graph: &AttributeGraph) -> Result<Self, AclError> {
        let mut out = Self::new(resource);
        for sg in graph.iter() {
            let is_authorization = sg
                .values(rdf::TYPE)
                .iter()
                .any(|v| v.as_url().is_some_and(|u| u.as_str() == acl::AUTHORIZATION));
            if !is_authorization {
                continue;
            }
            let name = sg.role().fragment().to_string();

            let mut scopes = Vec::with_capacity(2);
            for (predicate, scope) in [(acl::ACCESS_TO, Scope::Resource), (acl::DEFAULT, Scope::ContainerDefault)] {
                if let Some(target) = sg.url(predicate) {
                    if target != out.resource() {
                        return Err(AclError::ForeignTarget {
                            expected: out.resource.to_string(),
                            actual: target.to_string(),
                        });
                    }
                    scopes.push(scope);
                }
            }
            if scopes.is_empty() {
                return Err(AclError::MissingTarget(name));
            }

            let agent = if let Some(id) = sg.url(acl::AGENT) {
                Agent::Identity(id.clone())
            } else if let Some(class) = sg.url(acl::AGENT_CLASS) {
                if class.as_str() != PUBLIC_AGENT_CLASS {
                    return Err(AclError::UnsupportedAgentClass(class.to_string()));
                }
                Agent::Public
            } else {
                return Err(AclError::MissingAgent(name));
            };

            let access = Access::from_mode_iris(sg.values(acl::MODE).iter().filter_map(TypedValue::as_url).map(ResourceUrl::as_str))
                .map_err(|iri| AclError::UnknownMode(iri.to_string()))?;

            for scope in scopes {
                let merged = out.access(&agent, scope) | access;
                out.set(agent.clone(), scope, merged);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pass_graph::vocab::schema;
    use pretty_assertions::assert_eq;

    fn container() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/PASS/Passport/").unwrap()
    }

    fn alice() -> Agent {
        Agent::Identity(ResourceUrl::parse("https://alice.pod.example/profile/card#me").unwrap())
    }

    #[test]
    fn set_replaces_same_key() {
        let mut acl = AccessControlGraph::new(container());
        acl.set(alice(), Scope::Resource, Access::READ_ONLY);
        acl.set(alice(), Scope::Resource, Access::FULL);
        assert_eq!(acl.len(), 1);
        assert_eq!(acl.access(&alice(), Scope::Resource), Access::FULL);
        assert_eq!(acl.access(&alice(), Scope::ContainerDefault), Access::NONE);
    }

    #[test]
    fn attribute_graph_round_trip() {
        let mut acl = AccessControlGraph::new(container());
        acl.set(alice(), Scope::Resource, Access::FULL);
        acl.set(alice(), Scope::ContainerDefault, Access::FULL);
        acl.set(Agent::Public, Scope::Resource, Access::READ_ONLY);

        let graph = acl.to_attribute_graph().unwrap();
        assert_eq!(graph.len(), 3);
        let back = AccessControlGraph::from_attribute_graph(container(), &graph).unwrap();
        assert_eq!(back, acl);
    }

    #[test]
    fn empty_grants_are_not_exported() {
        let mut acl = AccessControlGraph::new(container());
        acl.set(Agent::Public, Scope::Resource, Access::NONE);
        assert!(acl.to_attribute_graph().unwrap().is_empty());
        assert!(!acl.has_public());
    }

    #[test]
    fn foreign_target_is_rejected() {
        let mut acl = AccessControlGraph::new(container());
        acl.set(alice(), Scope::Resource, Access::FULL);
        let graph = acl.to_attribute_graph().unwrap();

        let other = ResourceUrl::parse("https://alice.pod.example/PASS/Other/").unwrap();
        let err = AccessControlGraph::from_attribute_graph(other, &graph).unwrap_err();
        assert!(matches!(err, AclError::ForeignTarget { .. }));
    }

    #[test]
    fn non_authorization_subgraphs_are_ignored() {
        let note = SubGraph::builder(SubjectRole::Document)
            .add_string(schema::NAME, "x")
            .build()
            .unwrap();
        let graph = AttributeGraph::from_subgraphs([note]);
        let acl = AccessControlGraph::from_attribute_graph(container(), &graph).unwrap();
        assert!(acl.is_empty());
    }

    #[test]
    fn missing_agent_is_rejected() {
        let sg = SubGraph::builder(SubjectRole::named("grant-0").unwrap())
            .add_url(rdf::TYPE, acl::AUTHORIZATION)
            .add(acl::ACCESS_TO, container())
            .build()
            .unwrap();
        let err = AccessControlGraph::from_attribute_graph(container(), &AttributeGraph::from_subgraphs([sg]))
            .unwrap_err();
        assert_eq!(err, AclError::MissingAgent("grant-0".to_string()));
    }
}
