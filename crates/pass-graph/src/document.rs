//! Metadata records for uploaded documents
//!
//! A [`DocumentRecord`] is stored as the `#document` sub-graph of the
//! container's metadata file. It is created on first upload and amended on
//! every later upload of the same document type: fields are replaced, a
//! modification timestamp is appended, and the original upload timestamp
//! is kept.

use crate::checksum::Checksum;
use crate::error::GraphError;
use crate::graph::{AttributeGraph, Predicate, SubGraph, SubjectRole};
use crate::url::ResourceUrl;
use crate::value::{TypedValue, ValueType};
use crate::vocab::schema;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Stored in place of an expiration date the user did not enter
pub const NO_DATE_PROVIDED: &str = "No Date Provided";

/// Stored in place of a description the user did not enter
pub const NO_DESCRIPTION_PROVIDED: &str = "No Description Provided";

/// Document type whose uploads carry licence attributes
pub const DRIVERS_LICENSE: &str = "Driver's License";

const EXPIRATION_FORMAT: &str = "%m/%d/%Y";

/// Kind of document, as chosen on the upload form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentType(String);

impl DocumentType {
    /// Create a document type; surrounding whitespace is trimmed
    ///
    /// # Errors
    /// [`GraphError::InvalidValue`] if the name is blank
    pub fn new(name: impl Into<String>) -> Result<Self, GraphError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GraphError::InvalidValue {
                expected: ValueType::String,
                raw: name,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Container name: apostrophes dropped, spaces become `_`
    #[must_use]
    pub fn container_slug(&self) -> String {
        self.0.replace('\'', "").replace(' ', "_")
    }

    /// Whether uploads of this type are driver's licences
    #[must_use]
    pub fn is_drivers_license(&self) -> bool {
        self.0 == DRIVERS_LICENSE
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expiration as entered on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expiration {
    /// A concrete date
    On(NaiveDate),
    /// Nothing entered
    NotProvided,
}

impl Expiration {
    /// Stored text: `MM/DD/YYYY` or [`NO_DATE_PROVIDED`]
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::On(date) => date.format(EXPIRATION_FORMAT).to_string(),
            Self::NotProvided => NO_DATE_PROVIDED.to_string(),
        }
    }

    /// Parse stored text
    ///
    /// # Errors
    /// [`GraphError::InvalidValue`] for text that is neither a
    /// `MM/DD/YYYY` date nor the sentinel
    pub fn from_text(text: &str) -> Result<Self, GraphError> {
        if text == NO_DATE_PROVIDED {
            return Ok(Self::NotProvided);
        }
        NaiveDate::parse_from_str(text, EXPIRATION_FORMAT)
            .map(Self::On)
            .map_err(|_| GraphError::InvalidValue {
                expected: ValueType::Date,
                raw: text.to_string(),
            })
    }
}

impl From<Option<NaiveDate>> for Expiration {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::NotProvided, Self::On)
    }
}

/// Fields replaced when an existing document is uploaded again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRevision {
    /// New file name
    pub name: String,
    /// New expiration
    pub expiration: Expiration,
    /// New description
    pub description: Option<String>,
    /// Checksum of the new content
    pub checksum: Checksum,
    /// Location of the new content
    pub url: ResourceUrl,
    /// When the revision happened
    pub modified_at: DateTime<Utc>,
}

/// Metadata describing one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// File name
    pub name: String,
    /// Document type
    pub document_type: DocumentType,
    /// First upload time; never changed by revisions
    pub upload_date: DateTime<Utc>,
    /// Expiration
    pub expiration: Expiration,
    /// Description; `None` is stored as [`NO_DESCRIPTION_PROVIDED`]
    pub description: Option<String>,
    /// SHA-256 of the stored content
    pub checksum: Checksum,
    /// Location of the stored file
    pub url: ResourceUrl,
    /// Modification times, oldest first
    pub modified: Vec<DateTime<Utc>>,
    /// Attributes beyond the core set (e.g. licence fields)
    pub extra: Vec<(Predicate, TypedValue)>,
}

impl DocumentRecord {
    /// Description as stored, with the sentinel substituted
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION_PROVIDED)
    }

    /// Most recent modification, if any
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.modified.last().copied()
    }

    /// Replace revisable fields and append a modification timestamp
    pub fn apply_revision(&mut self, revision: DocumentRevision) {
        self.name = revision.name;
        self.expiration = revision.expiration;
        self.description = revision.description;
        self.checksum = revision.checksum;
        self.url = revision.url;
        self.modified.push(revision.modified_at);
    }

    /// Build the `#document` sub-graph
    #[must_use]
    pub fn to_subgraph(&self) -> SubGraph {
        let mut sg = SubGraph::new(SubjectRole::Document);
        sg.add(schema::UPLOAD_DATE, self.upload_date);
        sg.add(schema::NAME, TypedValue::string(&self.name));
        sg.add(schema::IDENTIFIER, TypedValue::string(self.document_type.as_str()));
        sg.add(schema::END_DATE, TypedValue::string(self.expiration.to_text()));
        sg.add(schema::SHA256, TypedValue::string(self.checksum.to_string()));
        sg.add(schema::DESCRIPTION, TypedValue::string(self.description_text()));
        sg.add(schema::URL, self.url.clone());
        for at in &self.modified {
            sg.add(schema::DATE_MODIFIED, *at);
        }
        for (predicate, value) in &self.extra {
            sg.add(predicate.clone(), value.clone());
        }
        sg
    }

    /// Build the metadata graph
    #[must_use]
    pub fn to_graph(&self) -> AttributeGraph {
        AttributeGraph::from_subgraphs([self.to_subgraph()])
    }

    /// Read a record from a metadata graph
    ///
    /// # Errors
    /// [`GraphError::MissingSubGraph`] without a `#document` subject;
    /// [`GraphError::MissingAttribute`] / [`GraphError::TypeMismatch`] when a
    /// core field is absent or mistyped; [`GraphError::InvalidValue`] for a
    /// malformed checksum or expiration
    pub fn from_graph(graph: &AttributeGraph) -> Result<Self, GraphError> {
        let sg = graph.require(&SubjectRole::Document)?;

        let checksum_text = sg.require_string(schema::SHA256)?;
        let checksum = checksum_text
            .parse::<Checksum>()
            .map_err(|_| GraphError::InvalidValue {
                expected: ValueType::String,
                raw: checksum_text.to_string(),
            })?;

        let url = sg.url(schema::URL).cloned().ok_or_else(|| GraphError::MissingAttribute {
            role: SubjectRole::Document.fragment().to_string(),
            predicate: schema::URL.to_string(),
        })?;

        let description = match sg.string(schema::DESCRIPTION) {
            None | Some(NO_DESCRIPTION_PROVIDED) => None,
            Some(text) => Some(text.to_string()),
        };

        let expiration = match sg.string(schema::END_DATE) {
            None => Expiration::NotProvided,
            Some(text) => Expiration::from_text(text)?,
        };

        let mut extra = Vec::new();
        for (predicate, values) in sg.iter() {
            let skip = match predicate.as_str() {
                schema::UPLOAD_DATE
                | schema::NAME
                | schema::END_DATE
                | schema::SHA256
                | schema::DESCRIPTION
                | schema::URL
                | schema::DATE_MODIFIED => values.len(),
                // first identifier is the document type
                schema::IDENTIFIER => 1,
                _ => 0,
            };
            for value in values.iter().skip(skip) {
                extra.push((predicate.clone(), value.clone()));
            }
        }

        Ok(Self {
            name: sg.require_string(schema::NAME)?.to_string(),
            document_type: DocumentType::new(sg.require_string(schema::IDENTIFIER)?)?,
            upload_date: sg.require_datetime(schema::UPLOAD_DATE)?,
            expiration,
            description,
            checksum,
            url,
            modified: sg.datetimes(schema::DATE_MODIFIED),
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record() -> DocumentRecord {
        DocumentRecord {
            name: "passport scan.pdf".to_string(),
            document_type: DocumentType::new("Passport").unwrap(),
            upload_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            expiration: Expiration::On(NaiveDate::from_ymd_opt(2030, 12, 31).unwrap()),
            description: None,
            checksum: Checksum::compute(b"scan"),
            url: ResourceUrl::parse("https://alice.pod.example/PASS/Passport/passport%20scan.pdf")
                .unwrap(),
            modified: Vec::new(),
            extra: Vec::new(),
        }
    }

    #[test]
    fn sentinels_are_written() {
        let mut rec = record();
        rec.expiration = Expiration::NotProvided;
        let sg = rec.to_subgraph();
        assert_eq!(sg.string(schema::END_DATE), Some(NO_DATE_PROVIDED));
        assert_eq!(sg.string(schema::DESCRIPTION), Some(NO_DESCRIPTION_PROVIDED));
    }

    #[test]
    fn expiration_uses_us_format() {
        let sg = record().to_subgraph();
        assert_eq!(sg.string(schema::END_DATE), Some("12/31/2030"));
    }

    #[test]
    fn graph_round_trip_through_triples() {
        let mut rec = record();
        rec.description = Some("renewed".to_string());
        rec.modified.push(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        rec.extra.push((Predicate::from_static(schema::HEIGHT), TypedValue::Integer(70)));

        let base = ResourceUrl::parse("https://alice.pod.example/PASS/Passport/document.ttl").unwrap();
        let triples = rec.to_graph().to_triples(&base);
        let back = DocumentRecord::from_graph(&AttributeGraph::from_triples(&triples)).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn revision_preserves_upload_date() {
        let mut rec = record();
        let original_upload = rec.upload_date;
        let t1 = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        rec.apply_revision(DocumentRevision {
            name: "new.pdf".to_string(),
            expiration: Expiration::NotProvided,
            description: Some("updated".to_string()),
            checksum: Checksum::compute(b"new"),
            url: rec.url.clone(),
            modified_at: t1,
        });
        assert_eq!(rec.upload_date, original_upload);
        assert_eq!(rec.modified, vec![t1]);
        assert_eq!(rec.name, "new.pdf");
        assert_eq!(rec.last_modified(), Some(t1));
    }

    #[test]
    fn missing_document_subgraph() {
        let err = DocumentRecord::from_graph(&AttributeGraph::new()).unwrap_err();
        assert_eq!(err, GraphError::MissingSubGraph("document".to_string()));
    }

    #[test]
    fn container_slug_strips_apostrophes() {
        let dl = DocumentType::new(DRIVERS_LICENSE).unwrap();
        assert_eq!(dl.container_slug(), "Drivers_License");
        assert!(dl.is_drivers_license());
        assert_eq!(
            DocumentType::new("Bank Statement").unwrap().container_slug(),
            "Bank_Statement"
        );
        assert!(DocumentType::new("   ").is_err());
    }

    #[test]
    fn expiration_text_round_trip() {
        assert_eq!(Expiration::from_text(NO_DATE_PROVIDED).unwrap(), Expiration::NotProvided);
        assert_eq!(
            Expiration::from_text("01/02/2031").unwrap(),
            Expiration::On(NaiveDate::from_ymd_opt(2031, 1, 2).unwrap())
        );
        assert!(Expiration::from_text("2031-01-02").is_err());
    }
}
