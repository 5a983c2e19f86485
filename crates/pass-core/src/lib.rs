//! PASS Core - document and message orchestration on a Pod
//!
//! The layer between the upload/message forms and the user's Pod:
//! - Uploads documents with a create-then-update fallback
//! - Writes access-control graphs for new document containers
//! - Sends messages to another user's inbox and lists them back
//! - Reports progress through timed status messages
//!
//! # Core Concepts
//!
//! - **[`RemoteStore`]**: every Pod request goes through this trait
//! - **[`UpsertOrchestrator`]**: one form, at most one submission in flight
//! - **[`MessageEnvelopeService`]**: inbox delivery with an outbox copy
//! - **[`SessionState`]**: login state shared by the resolvers
//!
//! # Example
//!
//! ```rust,ignore
//! use pass_core::prelude::*;
//!
//! # async fn example(store: Arc<dyn RemoteStore>, ui: Arc<dyn StatusDispatch>, form: Arc<dyn FormFields>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let session = Arc::new(SessionState::new());
//! let resolver = Arc::new(OidcIssuerResolver::new(session));
//! let orchestrator = UpsertOrchestrator::new(store, resolver, ui, form, PassConfig::default());
//!
//! let request = FileUploadRequest::new(DocumentType::new("Passport")?)
//!     .with_file(FilePayload::from_bytes("passport.pdf", "application/pdf", bytes));
//! match orchestrator.submit(request).await? {
//!     UpsertOutcome::Created | UpsertOutcome::Updated => {}
//!     UpsertOutcome::Failed(reason) => eprintln!("{reason}"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod acl;
pub mod clock;
pub mod config;
pub mod containers;
pub mod documents;
pub mod error;
pub mod identity;
pub mod messages;
pub mod notification;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod upload;

pub use acl::{apply_acl, apply_public, AclMode};
pub use clock::{Clock, SystemClock};
pub use config::{LoggingConfig, NotificationConfig, PassConfig};
pub use containers::ContainerLayout;
pub use documents::DocumentService;
pub use error::{
    ConfigError, CoreError, IdentityError, MessageError, StoreError, UploadError, ValidationError,
};
pub use identity::{profile_name, AuthenticatedFetch, IdentityResolver, OidcIssuerResolver};
pub use messages::{MessageEnvelopeService, SentMessage};
pub use notification::{Notifier, StatusAction, StatusDispatch};
pub use session::SessionState;
pub use state::{allowed_transitions, validate_transition, UploadState};
pub use store::{FileUpload, RemoteStore, WriteMode};
pub use telemetry::init_tracing;
pub use upload::{
    FailureReason, FileUploadRequest, FormFields, LicenseExtractor, UploadTarget, UpsertOrchestrator,
    UpsertOutcome,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with PASS Core
    pub use crate::{
        DocumentService, FileUploadRequest, FormFields, IdentityResolver, MessageEnvelopeService,
        OidcIssuerResolver, PassConfig, RemoteStore, SessionState, StatusAction, StatusDispatch,
        UploadTarget, UpsertOrchestrator, UpsertOutcome,
    };
    pub use pass_acl::Access;
    pub use pass_graph::{DocumentType, Expiration, FilePayload, MessageDraft, ResourceUrl};
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pass_acl::Access;
    use pass_graph::{DocumentType, ResourceUrl};
    use pretty_assertions::assert_eq;

    #[test]
    fn upload_state_serializes_as_name() {
        let json = serde_json::to_string(&UploadState::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
        let back: UploadState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UploadState::Processing);
    }

    #[test]
    fn configured_layout_flows_into_containers() {
        let config = PassConfig::from_toml_str(
            r#"
            pass_root = "Vault"
            public_access = { read = true, append = false, write = false, control = false }
            "#,
        )
        .unwrap();
        assert_eq!(config.public_access, Some(Access::READ_ONLY));

        let layout = ContainerLayout::from_config(&config);
        let pod = ResourceUrl::parse("https://alice.pod.example/").unwrap();
        assert_eq!(
            layout
                .document_container(&pod, &DocumentType::new("Driver's License").unwrap())
                .as_str(),
            "https://alice.pod.example/Vault/Drivers_License/"
        );
    }

    #[test]
    fn session_feeds_resolver() {
        let session = std::sync::Arc::new(SessionState::new());
        let resolver = OidcIssuerResolver::new(session.clone());
        assert_eq!(resolver.own_pod_url().unwrap_err(), IdentityError::NotLoggedIn);

        session.on_login(
            ResourceUrl::parse("https://pod.example/").unwrap(),
            ResourceUrl::parse("https://alice.pod.example/profile/card#me").unwrap(),
        );
        assert_eq!(
            resolver.pod_url_for("bob").unwrap().as_str(),
            "https://bob.pod.example/"
        );
        assert_eq!(
            resolver.own_pod_url().unwrap().as_str(),
            "https://alice.pod.example/"
        );

        session.on_logout();
        assert!(resolver.own_identity().is_err());
    }

    #[test]
    fn retryable_errors_are_transport_errors() {
        assert!(CoreError::from(StoreError::Timeout).is_retryable());
        assert!(!CoreError::from(StoreError::Conflict("x".to_string())).is_retryable());
        assert!(!CoreError::from(ValidationError::MissingFile).is_retryable());
    }
}
