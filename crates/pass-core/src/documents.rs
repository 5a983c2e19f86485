//! Reading stored documents back

use crate::config::PassConfig;
use crate::containers::ContainerLayout;
use crate::error::{CoreError, StoreError};
use crate::identity::IdentityResolver;
use crate::store::RemoteStore;
use crate::upload::UploadTarget;
use pass_graph::{AttributeGraph, DocumentRecord, DocumentType, ResourceUrl};
use std::sync::Arc;

/// Looks up and verifies uploaded documents
#[derive(Debug)]
pub struct DocumentService {
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityResolver>,
    layout: ContainerLayout,
}

impl DocumentService {
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
            layout: ContainerLayout::from_config(config),
        }
    }

    /// Container holding documents of `document_type` in the target Pod
    ///
    /// # Errors
    /// [`CoreError::Identity`] if the Pod cannot be resolved
    pub fn container(
        &self,
        target: &UploadTarget,
        document_type: &DocumentType,
    ) -> Result<ResourceUrl, CoreError> {
        let pod = match target {
            UploadTarget::SelfPod => self.identity.own_pod_url()?,
            UploadTarget::OtherPod(username) => self.identity.pod_url_for(username)?,
        };
        Ok(self.layout.document_container(&pod, document_type))
    }

    /// Metadata of the stored document, or `None` if nothing is stored
    ///
    /// # Errors
    /// Identity and store failures other than not-found; metadata that
    /// does not parse
    pub async fn locate(
        &self,
        target: &UploadTarget,
        document_type: &DocumentType,
    ) -> Result<Option<DocumentRecord>, CoreError> {
        let container = self.container(target, document_type)?;
        let metadata = self.layout.metadata_url(&container);
        let triples = match self.store.read_graph(&metadata).await {
            Ok(triples) => triples,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = DocumentRecord::from_graph(&AttributeGraph::from_triples(&triples))?;
        Ok(Some(record))
    }

    /// Whether the stored file still matches its recorded checksum
    ///
    /// # Errors
    /// Store failures while fetching the file
    pub async fn verify(&self, record: &DocumentRecord) -> Result<bool, StoreError> {
        let bytes = self.store.read_file(&record.url).await?;
        let intact = record.checksum.verify(&bytes);
        if !intact {
            tracing::warn!(url = %record.url, expected = %record.checksum.short(), "checksum mismatch");
        }
        Ok(intact)
    }

    /// Files in `container`, without sub-containers
    ///
    /// # Errors
    /// Store failures while listing
    pub async fn list_files(&self, container: &ResourceUrl) -> Result<Vec<ResourceUrl>, StoreError> {
        Ok(self
            .store
            .list_container(container)
            .await?
            .into_iter()
            .filter(|url| !url.is_container())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityError;
    use crate::store::MockRemoteStore;
    use chrono::{TimeZone, Utc};
    use pass_graph::{Checksum, Expiration};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Alice;

    impl IdentityResolver for Alice {
        fn own_identity(&self) -> Result<ResourceUrl, IdentityError> {
            Ok(ResourceUrl::parse("https://alice.pod.example/profile/card#me")?)
        }

        fn own_pod_url(&self) -> Result<ResourceUrl, IdentityError> {
            Ok(ResourceUrl::parse("https://alice.pod.example/")?)
        }

        fn pod_url_for(&self, username: &str) -> Result<ResourceUrl, IdentityError> {
            Ok(ResourceUrl::parse(format!("https://{username}.pod.example/"))?)
        }
    }

    fn record(content: &[u8]) -> DocumentRecord {
        DocumentRecord {
            name: "scan.pdf".to_string(),
            document_type: DocumentType::new("Bank Statement").unwrap(),
            upload_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            expiration: Expiration::NotProvided,
            description: None,
            checksum: Checksum::compute(content),
            url: ResourceUrl::parse("https://alice.pod.example/PASS/Bank_Statement/scan.pdf").unwrap(),
            modified: Vec::new(),
            extra: Vec::new(),
        }
    }

    fn service(store: MockRemoteStore) -> DocumentService {
        DocumentService::new(Arc::new(store), Arc::new(Alice), &PassConfig::default())
    }

    #[tokio::test]
    async fn locate_reads_metadata_of_other_pod() {
        let stored = record(b"pdf");
        let triples = stored
            .to_graph()
            .to_triples(&ResourceUrl::parse("https://bob.pod.example/PASS/Bank_Statement/document.ttl").unwrap());
        let mut store = MockRemoteStore::new();
        store
            .expect_read_graph()
            .withf(|u| u.as_str() == "https://bob.pod.example/PASS/Bank_Statement/document.ttl")
            .returning(move |_| Ok(triples.clone()));

        let found = service(store)
            .locate(
                &UploadTarget::OtherPod("bob".to_string()),
                &DocumentType::new("Bank Statement").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn locate_missing_is_none() {
        let mut store = MockRemoteStore::new();
        store
            .expect_read_graph()
            .returning(|u| Err(StoreError::NotFound(u.to_string())));

        let found = service(store)
            .locate(&UploadTarget::SelfPod, &DocumentType::new("Passport").unwrap())
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn verify_detects_changed_content() {
        let mut store = MockRemoteStore::new();
        store.expect_read_file().returning(|_| Ok(b"tampered".to_vec()));

        assert!(!service(store).verify(&record(b"pdf")).await.unwrap());
    }

    #[tokio::test]
    async fn list_files_skips_containers() {
        let mut store = MockRemoteStore::new();
        store
            .expect_list_container()
            .returning(|c| Ok(vec![c.join("a.pdf"), c.join_container("old"), c.join("document.ttl")]));

        let container = ResourceUrl::parse("https://alice.pod.example/PASS/Passport/").unwrap();
        let files = service(store).list_files(&container).await.unwrap();
        let names: Vec<_> = files.iter().map(ResourceUrl::file_name).collect();
        assert_eq!(names, vec!["a.pdf", "document.ttl"]);
    }
}
