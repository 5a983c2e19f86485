//! Where things live inside a Pod
//!
//! ```text
//! <pod>/<root>/<document type slug>/<file>
//! <pod>/<root>/<document type slug>/document.ttl
//! <pod>/<root>/inbox/
//! <pod>/<root>/outbox/
//! ```

use crate::config::PassConfig;
use pass_graph::{DocumentType, ResourceUrl};

/// Container layout derived from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLayout {
    root: String,
    inbox: String,
    outbox: String,
    metadata_file: String,
}

impl ContainerLayout {
    /// Layout for `config`
    #[must_use]
    pub fn from_config(config: &PassConfig) -> Self {
        Self {
            root: config.pass_root.clone(),
            inbox: config.inbox.clone(),
            outbox: config.outbox.clone(),
            metadata_file: config.metadata_file.clone(),
        }
    }

    /// Root container of PASS data in `pod`
    #[must_use]
    pub fn root(&self, pod: &ResourceUrl) -> ResourceUrl {
        pod.join_container(&self.root)
    }

    /// Container for documents of one type
    #[must_use]
    pub fn document_container(&self, pod: &ResourceUrl, document_type: &DocumentType) -> ResourceUrl {
        self.root(pod).join_container(&document_type.container_slug())
    }

    /// Metadata document inside a document container
    #[must_use]
    pub fn metadata_url(&self, container: &ResourceUrl) -> ResourceUrl {
        container.join(&self.metadata_file)
    }

    /// Name of the metadata document
    #[inline]
    #[must_use]
    pub fn metadata_file(&self) -> &str {
        &self.metadata_file
    }

    /// Inbox container in `pod`
    #[must_use]
    pub fn inbox(&self, pod: &ResourceUrl) -> ResourceUrl {
        self.root(pod).join_container(&self.inbox)
    }

    /// Outbox container in `pod`
    #[must_use]
    pub fn outbox(&self, pod: &ResourceUrl) -> ResourceUrl {
        self.root(pod).join_container(&self.outbox)
    }
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self::from_config(&PassConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/").unwrap()
    }

    #[test]
    fn document_container_uses_slug() {
        let layout = ContainerLayout::default();
        let dl = DocumentType::new("Driver's License").unwrap();
        assert_eq!(
            layout.document_container(&pod(), &dl).as_str(),
            "https://alice.pod.example/PASS/Drivers_License/"
        );
        let stmt = DocumentType::new("Bank Statement").unwrap();
        let container = layout.document_container(&pod(), &stmt);
        assert_eq!(
            layout.metadata_url(&container).as_str(),
            "https://alice.pod.example/PASS/Bank_Statement/document.ttl"
        );
    }

    #[test]
    fn inbox_and_outbox() {
        let layout = ContainerLayout::default();
        assert_eq!(layout.inbox(&pod()).as_str(), "https://alice.pod.example/PASS/inbox/");
        assert_eq!(layout.outbox(&pod()).as_str(), "https://alice.pod.example/PASS/outbox/");
    }

    #[test]
    fn root_from_config() {
        let layout = ContainerLayout::from_config(&PassConfig::new().with_pass_root("Vault"));
        assert_eq!(layout.inbox(&pod()).as_str(), "https://alice.pod.example/Vault/inbox/");
    }
}
