//! Writing access-control graphs to the store
//!
//! Composition is pure (see [`pass_acl::AccessControlComposer`]); this
//! module picks the starting graph and writes the result.

use crate::error::StoreError;
use crate::store::RemoteStore;
use pass_acl::{Access, AccessControlComposer, AccessControlGraph};
use pass_graph::ResourceUrl;

/// Starting point for an ACL write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclMode {
    /// Start from an empty graph (new resource)
    Create,
    /// Start from the resource's stored graph
    Update,
}

/// Grant `access` to `identity` on `resource`, plus optional public access
///
/// # Errors
/// In [`AclMode::Update`], [`StoreError::NotFound`] when the resource has
/// no ACL yet; any store failure on read or write
pub async fn apply_acl(
    store: &dyn RemoteStore,
    mode: AclMode,
    resource: &ResourceUrl,
    identity: &ResourceUrl,
    access: Access,
    public: Option<Access>,
) -> Result<AccessControlGraph, StoreError> {
    let base = base_graph(store, mode, resource).await?;
    let acl = AccessControlComposer::new().compose(base, identity, access, public);
    tracing::debug!(
        resource = %resource,
        ?mode,
        %access,
        public = ?public,
        "writing acl"
    );
    store.write_acl(&acl).await?;
    Ok(acl)
}

/// Add public access to `resource` without touching identity grants
///
/// # Errors
/// As [`apply_acl`]
pub async fn apply_public(
    store: &dyn RemoteStore,
    mode: AclMode,
    resource: &ResourceUrl,
    access: Access,
) -> Result<AccessControlGraph, StoreError> {
    let base = base_graph(store, mode, resource).await?;
    let acl = AccessControlComposer::new().grant_public(base, access);
    tracing::debug!(resource = %resource, ?mode, %access, "writing public acl");
    store.write_acl(&acl).await?;
    Ok(acl)
}

async fn base_graph(
    store: &dyn RemoteStore,
    mode: AclMode,
    resource: &ResourceUrl,
) -> Result<AccessControlGraph, StoreError> {
    match mode {
        AclMode::Create => Ok(AccessControlGraph::new(resource.clone())),
        AclMode::Update => store.read_acl(resource).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockRemoteStore;
    use pass_acl::{Agent, Scope};
    use pretty_assertions::assert_eq;

    fn container() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/PASS/Passport/").unwrap()
    }

    fn alice() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/profile/card#me").unwrap()
    }

    fn bob() -> ResourceUrl {
        ResourceUrl::parse("https://bob.pod.example/profile/card#me").unwrap()
    }

    #[tokio::test]
    async fn create_mode_never_reads() {
        let mut store = MockRemoteStore::new();
        store.expect_read_acl().never();
        store.expect_write_acl().times(1).returning(|_| Ok(()));

        let acl = apply_acl(&store, AclMode::Create, &container(), &alice(), Access::FULL, None)
            .await
            .unwrap();
        assert_eq!(acl.len(), 2);
        assert!(!acl.has_public());
    }

    #[tokio::test]
    async fn update_mode_keeps_existing_grants() {
        let mut existing = AccessControlGraph::new(container());
        existing.set(Agent::Identity(bob()), Scope::Resource, Access::READ_ONLY);

        let mut store = MockRemoteStore::new();
        store
            .expect_read_acl()
            .times(1)
            .returning(move |_| Ok(existing.clone()));
        store
            .expect_write_acl()
            .withf(|acl| acl.len() == 3)
            .times(1)
            .returning(|_| Ok(()));

        let acl = apply_acl(&store, AclMode::Update, &container(), &alice(), Access::FULL, None)
            .await
            .unwrap();
        assert_eq!(acl.access(&Agent::Identity(bob()), Scope::Resource), Access::READ_ONLY);
        assert_eq!(acl.access(&Agent::Identity(alice()), Scope::ContainerDefault), Access::FULL);
    }

    #[tokio::test]
    async fn update_mode_without_acl_is_not_found() {
        let mut store = MockRemoteStore::new();
        store
            .expect_read_acl()
            .returning(|r| Err(StoreError::NotFound(r.to_string())));
        store.expect_write_acl().never();

        let err = apply_acl(&store, AclMode::Update, &container(), &alice(), Access::FULL, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn public_only_write() {
        let mut store = MockRemoteStore::new();
        store.expect_write_acl().times(1).returning(|_| Ok(()));

        let acl = apply_public(&store, AclMode::Create, &container(), Access::READ_ONLY)
            .await
            .unwrap();
        assert!(acl.has_public());
        assert_eq!(acl.access(&Agent::Identity(alice()), Scope::Resource), Access::NONE);
    }
}
