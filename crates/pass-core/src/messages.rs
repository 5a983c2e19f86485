//! Message exchange between Pods
//!
//! A message is stored once in the recipient's inbox and once in the
//! sender's outbox. Listing reads every member of a box concurrently and
//! sorts after collection.

use crate::clock::{Clock, SystemClock};
use crate::config::PassConfig;
use crate::containers::ContainerLayout;
use crate::error::{MessageError, StoreError};
use crate::identity::{profile_name, IdentityResolver};
use crate::store::RemoteStore;
use futures::stream::{self, StreamExt};
use pass_graph::{
    sort_newest_first, MessageDraft, MessageEnvelope, MessageRecord, Participant, ResourceUrl,
};
use std::collections::HashSet;
use std::sync::Arc;

const READ_CONCURRENCY: usize = 8;

/// Where a sent message ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Location in the recipient's inbox, as chosen by the store
    pub location: ResourceUrl,
    /// Location of the sender's copy; `None` if that write failed
    pub outbox_copy: Option<ResourceUrl>,
}

/// Sends and lists messages
#[derive(Debug)]
pub struct MessageEnvelopeService {
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityResolver>,
    clock: Arc<dyn Clock>,
    layout: ContainerLayout,
}

impl MessageEnvelopeService {
    /// Service over `store`, laid out per `config`
    #[must_use]
    pub fn new(
        store: Arc<dyn RemoteStore>,
        identity: Arc<dyn IdentityResolver>,
        config: &PassConfig,
    ) -> Self {
        Self {
            store,
            identity,
            clock: Arc::new(SystemClock),
            layout: ContainerLayout::from_config(config),
        }
    }

    /// With a different time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Envelope stamped with the current time
    #[must_use]
    pub fn build(
        &self,
        draft: &MessageDraft,
        sender: &Participant,
        recipient: &Participant,
    ) -> MessageEnvelope {
        MessageEnvelope::build(draft, sender, recipient, self.clock.now())
    }

    /// Store `envelope` in the inbox of `recipient_pod`, with a copy in
    /// the sender's own outbox
    ///
    /// # Errors
    /// Fails only if the inbox write fails; a failed outbox copy is logged
    pub async fn send(
        &self,
        envelope: &MessageEnvelope,
        recipient_pod: &ResourceUrl,
    ) -> Result<SentMessage, MessageError> {
        let inbox = self.layout.inbox(recipient_pod);
        let triples = envelope.graph().to_triples(&inbox.join(envelope.slug()));
        let location = self
            .store
            .write_graph_in_container(&inbox, envelope.slug(), triples.clone())
            .await?;
        tracing::info!(location = %location, "message delivered");

        let outbox_copy = match self.copy_to_outbox(envelope.slug(), triples).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "outbox copy failed");
                None
            }
        };
        Ok(SentMessage {
            location,
            outbox_copy,
        })
    }

    async fn copy_to_outbox(
        &self,
        slug: &str,
        triples: Vec<pass_graph::Triple>,
    ) -> Result<ResourceUrl, MessageError> {
        let outbox = self.layout.outbox(&self.identity.own_pod_url()?);
        Ok(self
            .store
            .write_graph_in_container(&outbox, slug, triples)
            .await?)
    }

    /// Send `draft` to the user named `username` at the same provider
    ///
    /// Participant names come from profile documents, falling back to
    /// the username and the sender's identity.
    ///
    /// # Errors
    /// [`MessageError::Identity`] for an invalid username or no session;
    /// store failures on the inbox write
    pub async fn send_to_username(
        &self,
        draft: &MessageDraft,
        username: &str,
    ) -> Result<SentMessage, MessageError> {
        let recipient_pod = self.identity.pod_url_for(username)?;
        let recipient_identity = ResourceUrl::parse(
            recipient_pod
                .join_container("profile")
                .join("card")
                .with_fragment("me"),
        )?;
        let sender_identity = self.identity.own_identity()?;

        let recipient_name = self
            .display_name(&recipient_identity)
            .await
            .unwrap_or_else(|| username.trim().to_string());
        let sender_name = self
            .display_name(&sender_identity)
            .await
            .unwrap_or_else(|| sender_identity.to_string());

        let envelope = self.build(
            draft,
            &Participant::new(sender_name, sender_identity),
            &Participant::new(recipient_name, recipient_identity),
        );
        self.send(&envelope, &recipient_pod).await
    }

    async fn display_name(&self, identity: &ResourceUrl) -> Option<String> {
        match profile_name(self.store.as_ref(), identity).await {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(identity = %identity, error = %e, "profile name unavailable");
                None
            }
        }
    }

    /// The logged-in user's inbox
    ///
    /// # Errors
    /// [`MessageError::Identity`] without a session
    pub fn own_inbox(&self) -> Result<ResourceUrl, MessageError> {
        Ok(self.layout.inbox(&self.identity.own_pod_url()?))
    }

    /// The logged-in user's outbox
    ///
    /// # Errors
    /// [`MessageError::Identity`] without a session
    pub fn own_outbox(&self) -> Result<ResourceUrl, MessageError> {
        Ok(self.layout.outbox(&self.identity.own_pod_url()?))
    }

    /// Every readable message in `container`, newest first
    ///
    /// # Errors
    /// Fails only if the container cannot be listed
    pub async fn list(&self, container: &ResourceUrl) -> Result<Vec<MessageRecord>, MessageError> {
        self.refresh(container, Vec::new()).await
    }

    /// Bring `existing` in line with `container`, newest first
    ///
    /// Only locations absent from `existing` are read. Records whose
    /// location is no longer a member are dropped.
    ///
    /// # Errors
    /// Fails only if the container cannot be listed
    pub async fn refresh(
        &self,
        container: &ResourceUrl,
        mut existing: Vec<MessageRecord>,
    ) -> Result<Vec<MessageRecord>, MessageError> {
        let members: HashSet<ResourceUrl> = self
            .store
            .list_container(container)
            .await?
            .into_iter()
            .filter(|url| !url.is_container())
            .collect();

        let before = existing.len();
        existing.retain(|m| m.location.as_ref().is_some_and(|url| members.contains(url)));
        let seen: HashSet<&ResourceUrl> = existing.iter().filter_map(|m| m.location.as_ref()).collect();
        let unseen: Vec<ResourceUrl> = members
            .iter()
            .filter(|url| !seen.contains(url))
            .cloned()
            .collect();
        tracing::debug!(
            container = %container,
            known = seen.len(),
            removed = before - existing.len(),
            new = unseen.len(),
            "refreshing messages"
        );

        let fetched: Vec<Result<MessageRecord, (ResourceUrl, StoreError)>> = stream::iter(unseen)
            .map(|url| async move {
                match self.store.read_graph(&url).await {
                    Ok(triples) => Ok(MessageRecord::from_triples(&triples).with_location(url)),
                    Err(e) => Err((url, e)),
                }
            })
            .buffer_unordered(READ_CONCURRENCY)
            .collect()
            .await;

        for result in fetched {
            match result {
                Ok(record) => existing.push(record),
                Err((url, e)) => tracing::warn!(location = %url, error = %e, "skipping unreadable message"),
            }
        }
        sort_newest_first(&mut existing);
        Ok(existing)
    }
}
