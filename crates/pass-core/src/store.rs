//! Remote store abstraction
//!
//! The Pod is reached only through [`RemoteStore`]. Implementations own
//! transport, authentication, retries and timeouts; this crate sees
//! resources, graphs, and access-control graphs.

use crate::error::StoreError;
use async_trait::async_trait;
use pass_acl::AccessControlGraph;
use pass_graph::{ResourceUrl, Triple};
use std::fmt;

/// How a write treats an existing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Fail with [`StoreError::Conflict`] if the resource exists
    Create,
    /// Replace the resource if it exists
    Overwrite,
}

/// A file to place in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Suggested resource name
    pub name: String,
    /// MIME type
    pub content_type: String,
    /// Full content
    pub bytes: Vec<u8>,
}

/// Client for the user's Pod (or another user's Pod)
///
/// All methods are independent requests. Locations returned by the store
/// are authoritative; a suggested name may not be the one used.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Store a file in `container`, returning its location
    async fn place_file(
        &self,
        container: &ResourceUrl,
        file: &FileUpload,
        mode: WriteMode,
    ) -> Result<ResourceUrl, StoreError>;

    /// Fetch a file's full content
    async fn read_file(&self, url: &ResourceUrl) -> Result<Vec<u8>, StoreError>;

    /// Fetch a graph document as triples
    async fn read_graph(&self, url: &ResourceUrl) -> Result<Vec<Triple>, StoreError>;

    /// Write a graph document at a fixed location
    async fn write_graph(
        &self,
        url: &ResourceUrl,
        triples: Vec<Triple>,
        mode: WriteMode,
    ) -> Result<(), StoreError>;

    /// Create a graph document in `container` under a suggested name
    async fn write_graph_in_container(
        &self,
        container: &ResourceUrl,
        slug: &str,
        triples: Vec<Triple>,
    ) -> Result<ResourceUrl, StoreError>;

    /// Fetch the access-control graph of a resource
    ///
    /// Returns [`StoreError::NotFound`] when the resource has no ACL of its own.
    async fn read_acl(&self, resource: &ResourceUrl) -> Result<AccessControlGraph, StoreError>;

    /// Replace the access-control graph of `acl.resource()`
    async fn write_acl(&self, acl: &AccessControlGraph) -> Result<(), StoreError>;

    /// Locations of a container's members; sub-containers end with `/`
    async fn list_container(&self, container: &ResourceUrl) -> Result<Vec<ResourceUrl>, StoreError>;
}

impl fmt::Debug for dyn RemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RemoteStore")
    }
}
