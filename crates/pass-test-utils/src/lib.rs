//! Testing utilities for the PASS workspace
//!
//! An in-memory Pod, recording UI callbacks, controllable clocks, and
//! login fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pass_acl::AccessControlGraph;
use pass_core::{
    Clock, FileUpload, FormFields, OidcIssuerResolver, RemoteStore, SessionState, StatusAction,
    StatusDispatch, StoreError, WriteMode,
};
use pass_graph::vocab::foaf;
use pass_graph::{ResourceUrl, Triple, TypedValue};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const PROVIDER: &str = "https://pod.example/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Pod kept in memory, with per-operation call counts and failure injection
#[derive(Debug, Default)]
pub struct InMemoryStore {
    files: Mutex<BTreeMap<ResourceUrl, StoredFile>>,
    graphs: Mutex<BTreeMap<ResourceUrl, Vec<Triple>>>,
    acls: Mutex<HashMap<ResourceUrl, AccessControlGraph>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, StoreError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every call to `operation` fail with `error`
    pub fn fail_on(&self, operation: &'static str, error: StoreError) {
        self.failures.lock().insert(operation, error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn file(&self, url: &ResourceUrl) -> Option<StoredFile> {
        self.files.lock().get(url).cloned()
    }

    pub fn graph(&self, url: &ResourceUrl) -> Option<Vec<Triple>> {
        self.graphs.lock().get(url).cloned()
    }

    pub fn acl(&self, resource: &ResourceUrl) -> Option<AccessControlGraph> {
        self.acls.lock().get(resource).cloned()
    }

    pub fn insert_graph(&self, url: ResourceUrl, triples: Vec<Triple>) {
        self.graphs.lock().insert(url, triples);
    }

    pub fn insert_file(&self, url: ResourceUrl, bytes: impl Into<Vec<u8>>) {
        self.files.lock().insert(
            url,
            StoredFile {
                content_type: "application/octet-stream".to_string(),
                bytes: bytes.into(),
            },
        );
    }

    /// Publish a profile document naming `identity`
    pub fn insert_profile(&self, identity: &ResourceUrl, name: &str) {
        let profile = ResourceUrl::parse(identity.without_fragment()).unwrap();
        self.insert_graph(
            profile,
            vec![Triple::new(
                identity.as_str(),
                foaf::NAME,
                TypedValue::string(name),
            )],
        );
    }

    fn enter(&self, operation: &'static str) -> Result<(), StoreError> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        match self.failures.lock().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn exists(&self, url: &ResourceUrl) -> bool {
        self.files.lock().contains_key(url) || self.graphs.lock().contains_key(url)
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn place_file(
        &self,
        container: &ResourceUrl,
        file: &FileUpload,
        mode: WriteMode,
    ) -> Result<ResourceUrl, StoreError> {
        self.enter("place_file")?;
        let url = container.join(&file.name);
        if mode == WriteMode::Create && self.exists(&url) {
            return Err(StoreError::Conflict(url.to_string()));
        }
        self.files.lock().insert(
            url.clone(),
            StoredFile {
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            },
        );
        Ok(url)
    }

    async fn read_file(&self, url: &ResourceUrl) -> Result<Vec<u8>, StoreError> {
        self.enter("read_file")?;
        self.files
            .lock()
            .get(url)
            .map(|f| f.bytes.clone())
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }

    async fn read_graph(&self, url: &ResourceUrl) -> Result<Vec<Triple>, StoreError> {
        self.enter("read_graph")?;
        self.graphs
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }

    async fn write_graph(
        &self,
        url: &ResourceUrl,
        triples: Vec<Triple>,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        self.enter("write_graph")?;
        if mode == WriteMode::Create && self.exists(url) {
            return Err(StoreError::Conflict(url.to_string()));
        }
        self.graphs.lock().insert(url.clone(), triples);
        Ok(())
    }

    async fn write_graph_in_container(
        &self,
        container: &ResourceUrl,
        slug: &str,
        triples: Vec<Triple>,
    ) -> Result<ResourceUrl, StoreError> {
        self.enter("write_graph_in_container")?;
        let mut url = container.join(slug);
        if self.exists(&url) {
            url = container.join(&format!("{}-{slug}", uuid::Uuid::new_v4().simple()));
        }
        self.graphs.lock().insert(url.clone(), triples);
        Ok(url)
    }

    async fn read_acl(&self, resource: &ResourceUrl) -> Result<AccessControlGraph, StoreError> {
        self.enter("read_acl")?;
        self.acls
            .lock()
            .get(resource)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{resource}.acl")))
    }

    async fn write_acl(&self, acl: &AccessControlGraph) -> Result<(), StoreError> {
        self.enter("write_acl")?;
        self.acls.lock().insert(acl.resource().clone(), acl.clone());
        Ok(())
    }

    async fn list_container(&self, container: &ResourceUrl) -> Result<Vec<ResourceUrl>, StoreError> {
        self.enter("list_container")?;
        let prefix = container.as_str();
        let mut members = BTreeSet::new();
        let files = self.files.lock();
        let graphs = self.graphs.lock();
        for url in files.keys().chain(graphs.keys()) {
            let Some(rest) = url.as_str().strip_prefix(prefix) else {
                continue;
            };
            let member = match rest.find('/') {
                Some(idx) => container.join_container(&rest[..idx]),
                None => url.clone(),
            };
            members.insert(member);
        }
        Ok(members.into_iter().collect())
    }
}

/// Records every UI action
#[derive(Debug, Default)]
pub struct RecordingDispatch {
    actions: Mutex<Vec<StatusAction>>,
}

impl RecordingDispatch {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn actions(&self) -> Vec<StatusAction> {
        self.actions.lock().clone()
    }

    /// Text of every `SetMessage`, in order
    pub fn messages(&self) -> Vec<String> {
        self.actions
            .lock()
            .iter()
            .filter_map(|a| match a {
                StatusAction::SetMessage(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, action: &StatusAction) -> usize {
        self.actions.lock().iter().filter(|a| *a == action).count()
    }
}

impl StatusDispatch for RecordingDispatch {
    fn dispatch(&self, action: StatusAction) {
        self.actions.lock().push(action);
    }
}

/// Counts form resets
#[derive(Debug, Default)]
pub struct CountingFields {
    clears: AtomicUsize,
}

impl CountingFields {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl FormFields for CountingFields {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub fn timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
}

pub fn pod_url(username: &str) -> ResourceUrl {
    ResourceUrl::parse(format!("https://{username}.pod.example/")).unwrap()
}

pub fn identity_url(username: &str) -> ResourceUrl {
    ResourceUrl::parse(format!("https://{username}.pod.example/profile/card#me")).unwrap()
}

/// Session logged in as `username` at [`PROVIDER`]
pub fn logged_in_session(username: &str) -> Arc<SessionState> {
    let session = Arc::new(SessionState::new());
    session.on_login(ResourceUrl::parse(PROVIDER).unwrap(), identity_url(username));
    session
}

pub fn resolver_for(username: &str) -> Arc<OidcIssuerResolver> {
    Arc::new(OidcIssuerResolver::new(logged_in_session(username)))
}
