//! Inbox and outbox message envelopes
//!
//! A message is stored as one graph document with three sub-graphs:
//! `#message` (title, body, upload time), `#sender` and `#recipient`
//! (display name and identity URL each).

use crate::graph::{AttributeGraph, SubGraph, SubjectRole, Triple};
use crate::parser::{GraphParser, SubjectView};
use crate::url::ResourceUrl;
use crate::value::TypedValue;
use crate::vocab::schema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One side of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name
    pub name: String,
    /// Identity URL (WebID)
    pub identity: ResourceUrl,
}

impl Participant {
    /// Create a participant
    pub fn new(name: impl Into<String>, identity: ResourceUrl) -> Self {
        Self {
            name: name.into(),
            identity,
        }
    }
}

/// User-entered message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Subject line
    pub title: String,
    /// Body text
    pub message: String,
}

impl MessageDraft {
    /// Create a draft
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// A message ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnvelope {
    graph: AttributeGraph,
    slug: String,
}

impl MessageEnvelope {
    /// Assemble the three sub-graphs of a message
    #[must_use]
    pub fn build(
        draft: &MessageDraft,
        sender: &Participant,
        recipient: &Participant,
        sent_at: DateTime<Utc>,
    ) -> Self {
        let mut message = SubGraph::new(SubjectRole::Message);
        message.add(schema::UPLOAD_DATE, sent_at);
        message.add(schema::TITLE, TypedValue::string(&draft.title));
        message.add(schema::MESSAGE, TypedValue::string(&draft.message));

        let mut from = SubGraph::new(SubjectRole::Sender);
        from.add(schema::SENDER, TypedValue::string(&sender.name));
        from.add(schema::URL, sender.identity.clone());

        let mut to = SubGraph::new(SubjectRole::Recipient);
        to.add(schema::RECIPIENT, TypedValue::string(&recipient.name));
        to.add(schema::URL, recipient.identity.clone());

        Self {
            graph: AttributeGraph::from_subgraphs([message, from, to]),
            slug: message_slug(&draft.title, sent_at),
        }
    }

    /// The envelope graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &AttributeGraph {
        &self.graph
    }

    /// Suggested resource name, e.g. `lunch-plans-20240501-093000.ttl`
    ///
    /// Only a suggestion; the store may pick another name.
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Slug suggestion for a message titled `title` sent at `sent_at`
#[must_use]
pub fn message_slug(title: &str, sent_at: DateTime<Utc>) -> String {
    let mut base = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_lowercase());
        } else if !base.ends_with('-') && !base.is_empty() {
            base.push('-');
        }
    }
    let base = base.trim_end_matches('-');
    let base = if base.is_empty() { "message" } else { base };
    format!("{base}-{}.ttl", sent_at.format("%Y%m%d-%H%M%S"))
}

/// Flat view of a stored message; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Body text
    pub message: Option<String>,
    /// Subject line
    pub title: Option<String>,
    /// When the message was sent
    pub upload_date: Option<DateTime<Utc>>,
    /// Sender display name
    pub sender: Option<String>,
    /// Recipient display name
    pub recipient: Option<String>,
    /// Sender identity URL
    pub sender_identity: Option<ResourceUrl>,
    /// Recipient identity URL
    pub recipient_identity: Option<ResourceUrl>,
    /// Where the message is stored, when read from a container
    pub location: Option<ResourceUrl>,
}

impl MessageRecord {
    /// Parse a message from its stored triples
    ///
    /// Sub-graphs are located by exact role first, then by fragment
    /// containment for documents written by older clients. Missing
    /// sub-graphs or predicates leave fields empty.
    #[must_use]
    pub fn from_triples(triples: &[Triple]) -> Self {
        let parser = GraphParser::new(triples);
        let locate = |role: SubjectRole| -> Option<SubjectView<'_>> {
            parser
                .role(&role)
                .or_else(|| parser.subject_containing(&format!("#{}", role.fragment())))
        };

        let message = locate(SubjectRole::Message);
        let sender = locate(SubjectRole::Sender);
        let recipient = locate(SubjectRole::Recipient);

        Self {
            message: message.and_then(|m| m.string(schema::MESSAGE)).map(str::to_string),
            title: message.and_then(|m| m.string(schema::TITLE)).map(str::to_string),
            upload_date: message.and_then(|m| m.datetime(schema::UPLOAD_DATE)),
            sender: sender.and_then(|s| s.string(schema::SENDER)).map(str::to_string),
            recipient: recipient
                .and_then(|r| r.string(schema::RECIPIENT))
                .map(str::to_string),
            sender_identity: sender.and_then(|s| s.url(schema::URL)).cloned(),
            recipient_identity: recipient.and_then(|r| r.url(schema::URL)).cloned(),
            location: None,
        }
    }

    /// Parse a message from a role-keyed graph
    #[must_use]
    pub fn from_graph(graph: &AttributeGraph) -> Self {
        let message = graph.get(&SubjectRole::Message);
        let sender = graph.get(&SubjectRole::Sender);
        let recipient = graph.get(&SubjectRole::Recipient);
        Self {
            message: message.and_then(|m| m.string(schema::MESSAGE)).map(str::to_string),
            title: message.and_then(|m| m.string(schema::TITLE)).map(str::to_string),
            upload_date: message.and_then(|m| m.datetime(schema::UPLOAD_DATE)),
            sender: sender.and_then(|s| s.string(schema::SENDER)).map(str::to_string),
            recipient: recipient
                .and_then(|r| r.string(schema::RECIPIENT))
                .map(str::to_string),
            sender_identity: sender.and_then(|s| s.url(schema::URL)).cloned(),
            recipient_identity: recipient.and_then(|r| r.url(schema::URL)).cloned(),
            location: None,
        }
    }

    /// Attach the storage location
    #[must_use]
    pub fn with_location(mut self, location: ResourceUrl) -> Self {
        self.location = Some(location);
        self
    }
}

/// Sort newest first; messages without an upload time go last
pub fn sort_newest_first(records: &mut [MessageRecord]) {
    records.sort_by(|a, b| match (a.upload_date, b.upload_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
