//! Document upsert orchestration
//!
//! [`UpsertOrchestrator::submit`] uploads a file and its metadata, trying a
//! create first and falling back to an update when the create fails. Every
//! submission ends in exactly one [`UpsertOutcome`], and the form is reset
//! exactly once on every exit path.
//!
//! # Workflow
//! 1. Reject if another submission is running
//! 2. Validate the form (no remote calls)
//! 3. Read the file and compute its checksum
//! 4. Create: place file, write metadata, write ACL
//! 5. On any create failure, update: overwrite file, amend metadata
//! 6. Clean up

use crate::acl::{apply_acl, AclMode};
use crate::clock::{Clock, SystemClock};
use crate::config::PassConfig;
use crate::containers::ContainerLayout;
use crate::error::{StoreError, UploadError, ValidationError};
use crate::identity::IdentityResolver;
use crate::notification::{Notifier, StatusAction, StatusDispatch};
use crate::state::{validate_transition, UploadState};
use crate::store::{FileUpload, RemoteStore, WriteMode};
use chrono::{DateTime, Utc};
use pass_graph::{
    license_attributes, AttributeGraph, Checksum, ChecksumError, DocumentRecord, DocumentRevision,
    DocumentType, Expiration, FilePayload, LicenseFields, Predicate, ResourceUrl, TypedValue,
};
use parking_lot::Mutex;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Transient form inputs owned by the UI
pub trait FormFields: Send + Sync + Debug {
    /// Reset every input
    fn clear(&self);
}

/// Reads driver's licence barcode fields from an uploaded image
pub trait LicenseExtractor: Send + Sync + Debug {
    /// AAMVA fields, or `None` when no barcode could be read
    fn extract(&self, bytes: &[u8]) -> Option<LicenseFields>;
}

/// Whose Pod receives the upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// The logged-in user's Pod
    SelfPod,
    /// Another user's Pod at the same provider
    OtherPod(String),
}

/// One form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadRequest {
    /// Selected file, if any
    pub file: Option<FilePayload>,
    /// Document type
    pub document_type: DocumentType,
    /// Expiration as entered
    pub expiration: Expiration,
    /// Description as entered
    pub description: Option<String>,
    /// Destination
    pub target: UploadTarget,
}

impl FileUploadRequest {
    /// Request for the user's own Pod with no file selected yet
    #[must_use]
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            file: None,
            document_type,
            expiration: Expiration::NotProvided,
            description: None,
            target: UploadTarget::SelfPod,
        }
    }

    /// With the selected file
    #[must_use]
    pub fn with_file(mut self, file: FilePayload) -> Self {
        self.file = Some(file);
        self
    }

    /// With an expiration
    #[must_use]
    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    /// With a description; blank text counts as none
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    /// Upload into `username`'s Pod instead of the user's own
    #[must_use]
    pub fn to_username(mut self, username: impl Into<String>) -> Self {
        self.target = UploadTarget::OtherPod(username.into());
        self
    }

    fn validate(&self) -> Result<&FilePayload, ValidationError> {
        if let UploadTarget::OtherPod(username) = &self.target {
            if username.trim().is_empty() {
                return Err(ValidationError::MissingUsername);
            }
        }
        self.file.as_ref().ok_or(ValidationError::MissingFile)
    }
}

/// Why a submission failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Form incomplete; nothing was sent
    Validation(ValidationError),
    /// File content could not be read
    Integrity(String),
    /// Destination Pod could not be resolved
    Identity(String),
    /// Scanned licence fields were malformed
    Metadata(String),
    /// The store rejected both create and update
    Remote(String),
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::Integrity(m) | Self::Identity(m) | Self::Metadata(m) | Self::Remote(m) => {
                f.write_str(m)
            }
        }
    }
}

/// Terminal result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New document stored
    Created,
    /// Existing document replaced
    Updated,
    /// Nothing (or not everything) stored
    Failed(FailureReason),
}

impl UpsertOutcome {
    /// Whether the document was stored
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Everything the create and update paths need, computed once
struct Prepared {
    container: ResourceUrl,
    metadata_url: ResourceUrl,
    upload: FileUpload,
    checksum: Checksum,
    license: Vec<(Predicate, TypedValue)>,
    /// A barcode scan was attempted; its result replaces stored licence attributes
    license_scanned: bool,
    now: DateTime<Utc>,
}

/// Runs document submissions for one upload form
#[derive(Debug)]
pub struct UpsertOrchestrator {
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityResolver>,
    notifier: Notifier,
    fields: Arc<dyn FormFields>,
    clock: Arc<dyn Clock>,
    license_extractor: Option<Arc<dyn LicenseExtractor>>,
    layout: ContainerLayout,
    config: PassConfig,
    state: Mutex<UploadState>,
    in_flight: AtomicBool,
}

impl UpsertOrchestrator {
    /// Create an orchestrator for one form
    #[must_use]
    pub fn new(
        store: Arc<dyn RemoteStore>,
        identity: Arc<dyn IdentityResolver>,
        dispatch: Arc<dyn StatusDispatch>,
        fields: Arc<dyn FormFields>,
        config: PassConfig,
    ) -> Self {
        Self {
            store,
            identity,
            notifier: Notifier::new(dispatch),
            fields,
            clock: Arc::new(SystemClock),
            license_extractor: None,
            layout: ContainerLayout::from_config(&config),
            config,
            state: Mutex::new(UploadState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// With a different time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With driver's licence barcode extraction
    #[must_use]
    pub fn with_license_extractor(mut self, extractor: Arc<dyn LicenseExtractor>) -> Self {
        self.license_extractor = Some(extractor);
        self
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> UploadState {
        *self.state.lock()
    }

    /// Whether a submission is running
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one submission to its terminal outcome
    ///
    /// # Errors
    /// [`UploadError::InFlight`] if a submission is already running; the
    /// running one is unaffected. All later failures are reported as
    /// [`UpsertOutcome::Failed`].
    pub async fn submit(&self, request: FileUploadRequest) -> Result<UpsertOutcome, UploadError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(document_type = %request.document_type, "submission rejected: upload in flight");
            return Err(UploadError::InFlight);
        }
        let cleanup = Cleanup { orchestrator: self, done: false };

        self.transition(UploadState::Processing)?;
        self.notifier.dispatch(StatusAction::SetProcessing);
        tracing::info!(
            document_type = %request.document_type,
            target = ?request.target,
            "submission started"
        );

        let outcome = self.run(&request).await;

        let terminal = if outcome.is_success() {
            UploadState::Succeeded
        } else {
            UploadState::Failed
        };
        self.transition(terminal)?;
        cleanup.finish();

        match &outcome {
            UpsertOutcome::Failed(reason) => {
                tracing::warn!(document_type = %request.document_type, %reason, "submission failed");
            }
            ok => tracing::info!(document_type = %request.document_type, outcome = ?ok, "submission finished"),
        }
        Ok(outcome)
    }

    async fn run(&self, request: &FileUploadRequest) -> UpsertOutcome {
        let file = match request.validate() {
            Ok(file) => file,
            Err(reason) => {
                self.notifier.run(
                    format!("Submission failed. Reason: {reason}"),
                    self.config.notifications.failure_secs,
                );
                return self.fail(FailureReason::Validation(reason)).await;
            }
        };

        let prepared = match self.prepare(request, file).await {
            Ok(prepared) => prepared,
            Err(reason) => {
                self.notifier.run(
                    format!("Operation failed. Reason: {reason}"),
                    self.config.notifications.failure_secs,
                );
                return self.fail(reason).await;
            }
        };

        self.notifier.run(
            format!("Uploading \"{}\" to Pod...", file.name),
            self.config.notifications.uploading_secs,
        );
        match self.create(request, &prepared).await {
            Ok(()) => {
                self.notifier.run(
                    format!("File \"{}\" uploaded to Pod.", file.name),
                    self.config.notifications.success_secs,
                );
                return UpsertOutcome::Created;
            }
            Err(e) => {
                tracing::warn!(
                    container = %prepared.container,
                    error = %e,
                    conflict = e.is_conflict(),
                    "create failed, updating instead"
                );
            }
        }

        self.notifier.run(
            "Updating contents in Pod...",
            self.config.notifications.updating_secs,
        );
        match self.update(request, &prepared).await {
            Ok(()) => {
                self.notifier.run(
                    format!("File \"{}\" updated on Pod.", file.name),
                    self.config.notifications.success_secs,
                );
                UpsertOutcome::Updated
            }
            Err(e) => {
                self.notifier.run(
                    format!("Operation failed. Reason: {e}"),
                    self.config.notifications.failure_secs,
                );
                self.fail(FailureReason::Remote(e.to_string())).await
            }
        }
    }

    async fn fail(&self, reason: FailureReason) -> UpsertOutcome {
        tokio::time::sleep(self.config.clear_delay()).await;
        UpsertOutcome::Failed(reason)
    }

    async fn prepare(
        &self,
        request: &FileUploadRequest,
        file: &FilePayload,
    ) -> Result<Prepared, FailureReason> {
        let pod = match &request.target {
            UploadTarget::SelfPod => self.identity.own_pod_url(),
            UploadTarget::OtherPod(username) => self.identity.pod_url_for(username),
        }
        .map_err(|e| FailureReason::Identity(e.to_string()))?;

        let bytes = file
            .source
            .read_all()
            .await
            .map_err(|e| {
                FailureReason::Integrity(ChecksumError::Unreadable(e.to_string()).to_string())
            })?;
        let checksum = Checksum::compute(&bytes);
        tracing::debug!(file = %file.name, checksum = %checksum.short(), size = bytes.len(), "checksum computed");

        let license_scanned = self.license_extractor.is_some() && request.document_type.is_drivers_license();
        let license = match (&self.license_extractor, request.document_type.is_drivers_license()) {
            (Some(extractor), true) => match extractor.extract(&bytes) {
                Some(fields) => {
                    license_attributes(&fields).map_err(|e| FailureReason::Metadata(e.to_string()))?
                }
                None => {
                    tracing::warn!(file = %file.name, "no licence barcode found");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        let container = self.layout.document_container(&pod, &request.document_type);
        let metadata_url = self.layout.metadata_url(&container);
        Ok(Prepared {
            container,
            metadata_url,
            upload: FileUpload {
                name: file.name.clone(),
                content_type: file.content_type.clone(),
                bytes,
            },
            checksum,
            license,
            license_scanned,
            now: self.clock.now(),
        })
    }

    async fn create(&self, request: &FileUploadRequest, prepared: &Prepared) -> Result<(), StoreError> {
        let url = self
            .store
            .place_file(&prepared.container, &prepared.upload, WriteMode::Create)
            .await?;
        tracing::debug!(url = %url, "file created");

        let record = DocumentRecord {
            name: prepared.upload.name.clone(),
            document_type: request.document_type.clone(),
            upload_date: prepared.now,
            expiration: request.expiration,
            description: request.description.clone(),
            checksum: prepared.checksum,
            url,
            modified: Vec::new(),
            extra: prepared.license.clone(),
        };
        self.store
            .write_graph(
                &prepared.metadata_url,
                record.to_graph().to_triples(&prepared.metadata_url),
                WriteMode::Create,
            )
            .await?;

        let identity = self
            .identity
            .own_identity()
            .map_err(|e| StoreError::Forbidden(e.to_string()))?;
        apply_acl(
            self.store.as_ref(),
            AclMode::Create,
            &prepared.container,
            &identity,
            self.config.owner_access,
            self.config.public_access,
        )
        .await?;
        Ok(())
    }

    async fn update(&self, request: &FileUploadRequest, prepared: &Prepared) -> Result<(), StoreError> {
        let url = self
            .store
            .place_file(&prepared.container, &prepared.upload, WriteMode::Overwrite)
            .await?;
        tracing::debug!(url = %url, "file overwritten");

        let revision = DocumentRevision {
            name: prepared.upload.name.clone(),
            expiration: request.expiration,
            description: request.description.clone(),
            checksum: prepared.checksum,
            url: url.clone(),
            modified_at: prepared.now,
        };

        let record = match self.store.read_graph(&prepared.metadata_url).await {
            Ok(triples) => match DocumentRecord::from_graph(&AttributeGraph::from_triples(&triples)) {
                Ok(mut record) => {
                    record.apply_revision(revision);
                    if prepared.license_scanned {
                        record.extra.clone_from(&prepared.license);
                    }
                    record
                }
                Err(e) => {
                    tracing::warn!(metadata = %prepared.metadata_url, error = %e, "stored metadata unreadable, replacing");
                    fresh_record(request, prepared, url)
                }
            },
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(metadata = %prepared.metadata_url, "metadata missing, recreating");
                fresh_record(request, prepared, url)
            }
            Err(e) => return Err(e),
        };

        self.store
            .write_graph(
                &prepared.metadata_url,
                record.to_graph().to_triples(&prepared.metadata_url),
                WriteMode::Overwrite,
            )
            .await
    }

    fn transition(&self, to: UploadState) -> Result<(), UploadError> {
        let mut state = self.state.lock();
        validate_transition(*state, to)?;
        *state = to;
        Ok(())
    }

    fn cleanup(&self) {
        self.fields.clear();
        self.notifier.dispatch(StatusAction::ClearFile);
        self.notifier.dispatch(StatusAction::ClearProcessing);
        {
            let mut state = self.state.lock();
            // a dropped submission may still be Processing
            if validate_transition(*state, UploadState::Cleared).is_err() {
                tracing::debug!(from = ?*state, "cleanup outside terminal state");
            }
            *state = UploadState::Cleared;
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

fn fresh_record(request: &FileUploadRequest, prepared: &Prepared, url: ResourceUrl) -> DocumentRecord {
    DocumentRecord {
        name: prepared.upload.name.clone(),
        document_type: request.document_type.clone(),
        upload_date: prepared.now,
        expiration: request.expiration,
        description: request.description.clone(),
        checksum: prepared.checksum,
        url,
        modified: vec![prepared.now],
        extra: prepared.license.clone(),
    }
}

/// Resets the form once, on `finish` or when the submission is dropped
struct Cleanup<'a> {
    orchestrator: &'a UpsertOrchestrator,
    done: bool,
}

impl Cleanup<'_> {
    fn finish(mut self) {
        self.done = true;
        self.orchestrator.cleanup();
    }
}

impl Drop for Cleanup<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.orchestrator.cleanup();
        }
    }
}
