//! PASS Graph Model
//!
//! Typed attribute graphs for the documents and messages a PASS user keeps
//! in their Pod, plus the content checksums that tie metadata to files.
//!
//! # Core Concepts
//!
//! - [`AttributeGraph`]: role-keyed set of [`SubGraph`]s, flattened to
//!   [`Triple`]s for storage
//! - [`TypedValue`]: attribute values with an explicit type tag
//! - [`GraphParser`]: field lookup over stored triples
//! - [`Checksum`]: SHA-256 over full file content
//! - [`DocumentRecord`] / [`MessageEnvelope`]: the two stored record kinds
//!
//! # Example
//!
//! ```rust
//! use pass_graph::{MessageDraft, MessageEnvelope, MessageRecord, Participant, ResourceUrl};
//! use chrono::Utc;
//!
//! let alice = Participant::new("Alice", ResourceUrl::parse("https://alice.example/profile/card#me")?);
//! let bob = Participant::new("Bob", ResourceUrl::parse("https://bob.example/profile/card#me")?);
//! let envelope = MessageEnvelope::build(&MessageDraft::new("Hi", "Hello"), &alice, &bob, Utc::now());
//!
//! let stored_at = ResourceUrl::parse("https://bob.example/PASS/inbox/hi.ttl")?;
//! let record = MessageRecord::from_triples(&envelope.graph().to_triples(&stored_at));
//! assert_eq!(record.sender.as_deref(), Some("Alice"));
//! # Ok::<(), pass_graph::GraphError>(())
//! ```

#![warn(unreachable_pub)]

mod checksum;
mod content;
mod document;
mod error;
mod graph;
mod license;
mod message;
mod parser;
mod url;
mod value;
pub mod vocab;

pub use checksum::{Checksum, ChecksumError};
pub use content::{FilePayload, FileSource};
pub use document::{
    DocumentRecord, DocumentRevision, DocumentType, Expiration, DRIVERS_LICENSE,
    NO_DATE_PROVIDED, NO_DESCRIPTION_PROVIDED,
};
pub use error::GraphError;
pub use graph::{AttributeGraph, Predicate, SubGraph, SubGraphBuilder, SubjectRole, Triple};
pub use license::{license_attributes, LicenseFields};
pub use message::{
    message_slug, sort_newest_first, MessageDraft, MessageEnvelope, MessageRecord, Participant,
};
pub use parser::{GraphParser, SubjectView};
pub use url::{encode_segment, ResourceUrl};
pub use value::{TypedValue, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
