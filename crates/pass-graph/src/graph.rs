//! Multi-subject attribute graphs
//!
//! An [`AttributeGraph`] is an ordered set of [`SubGraph`]s. Each sub-graph
//! is keyed by a [`SubjectRole`] and maps predicates to one or more
//! [`TypedValue`]s. When stored, a sub-graph becomes the subject
//! `<document-url>#<role>`.
//!
//! # Example
//!
//! ```
//! use pass_graph::{AttributeGraph, SubGraph, SubjectRole, vocab::schema};
//!
//! let message = SubGraph::builder(SubjectRole::Message)
//!     .add_string(schema::TITLE, "Hi")
//!     .add_string(schema::MESSAGE, "Hello")
//!     .build()
//!     .unwrap();
//!
//! let graph = AttributeGraph::from_subgraphs([message]);
//! assert_eq!(graph.get(&SubjectRole::Message).unwrap().string(schema::TITLE), Some("Hi"));
//! ```

use crate::error::GraphError;
use crate::url::ResourceUrl;
use crate::value::{TypedValue, ValueType};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt::{self, Display, Formatter, Write as _};

/// Predicate identifier (a vocabulary IRI)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Predicate(Cow<'static, str>);

impl Predicate {
    /// Wrap a vocabulary constant without allocating
    #[inline]
    #[must_use]
    pub const fn from_static(iri: &'static str) -> Self {
        Self(Cow::Borrowed(iri))
    }

    /// Validate a dynamic predicate identifier
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidPredicate`] for empty identifiers or
    /// identifiers containing whitespace
    pub fn parse(iri: impl Into<String>) -> Result<Self, GraphError> {
        let iri = iri.into();
        if iri.is_empty() || iri.chars().any(char::is_whitespace) {
            return Err(GraphError::InvalidPredicate(iri));
        }
        Ok(Self(Cow::Owned(iri)))
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Predicate {
    fn from(iri: &'static str) -> Self {
        Self::from_static(iri)
    }
}

// Hash and Eq of the wrapped `Cow<str>` match those of `str`
impl Borrow<str> for Predicate {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a sub-graph within its document
///
/// Roles replace substring matching on subject identifiers: each role maps
/// to exactly one fragment name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectRole {
    /// Metadata for an uploaded file
    Document,
    /// Message content
    Message,
    /// Message sender
    Sender,
    /// Message recipient
    Recipient,
    /// Any other named subject (e.g. ACL authorizations)
    Named(String),
}

impl SubjectRole {
    /// Create a custom role, validating the fragment name
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidRole`] for empty names or names
    /// containing `#`, `/`, or whitespace
    pub fn named(name: impl Into<String>) -> Result<Self, GraphError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|c| c == '#' || c == '/' || c.is_whitespace()) {
            return Err(GraphError::InvalidRole(name));
        }
        Ok(Self::from_fragment(&name))
    }

    /// Fragment name used in the subject identifier
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::Message => "message",
            Self::Sender => "sender",
            Self::Recipient => "recipient",
            Self::Named(name) => name,
        }
    }

    /// Map a fragment back to its role
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment {
            "document" => Self::Document,
            "message" => Self::Message,
            "sender" => Self::Sender,
            "recipient" => Self::Recipient,
            other => Self::Named(other.to_string()),
        }
    }
}

impl Display for SubjectRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.fragment())
    }
}

/// One subject/predicate/value statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject identifier (`<document-url>#<fragment>`)
    pub subject: String,
    /// Predicate IRI
    pub predicate: Predicate,
    /// Typed object value
    pub object: TypedValue,
}

impl Triple {
    /// Create a triple
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<Predicate>,
        object: impl Into<TypedValue>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A named subject and its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGraph {
    role: SubjectRole,
    attributes: IndexMap<Predicate, Vec<TypedValue>>,
}

impl SubGraph {
    /// Create an empty sub-graph
    #[inline]
    #[must_use]
    pub fn new(role: SubjectRole) -> Self {
        Self {
            role,
            attributes: IndexMap::new(),
        }
    }

    /// Start a fluent builder
    #[inline]
    #[must_use]
    pub fn builder(role: SubjectRole) -> SubGraphBuilder {
        SubGraphBuilder::new(role)
    }

    /// Role of this sub-graph
    #[inline]
    #[must_use]
    pub fn role(&self) -> &SubjectRole {
        &self.role
    }

    /// Append a value to a predicate
    pub fn add(&mut self, predicate: impl Into<Predicate>, value: impl Into<TypedValue>) {
        self.attributes
            .entry(predicate.into())
            .or_default()
            .push(value.into());
    }

    /// Replace all values of a predicate with a single value
    pub fn set(&mut self, predicate: impl Into<Predicate>, value: impl Into<TypedValue>) {
        self.attributes.insert(predicate.into(), vec![value.into()]);
    }

    /// Remove a predicate, returning its values
    pub fn remove(&mut self, predicate: &str) -> Option<Vec<TypedValue>> {
        self.attributes.shift_remove(predicate)
    }

    /// All values recorded for a predicate (empty if absent)
    #[must_use]
    pub fn values(&self, predicate: &str) -> &[TypedValue] {
        self.attributes.get(predicate).map_or(&[][..], Vec::as_slice)
    }

    /// First value recorded for a predicate
    #[must_use]
    pub fn first(&self, predicate: &str) -> Option<&TypedValue> {
        self.values(predicate).first()
    }

    /// First string value of a predicate
    #[must_use]
    pub fn string(&self, predicate: &str) -> Option<&str> {
        self.values(predicate).iter().find_map(TypedValue::as_str)
    }

    /// All string values of a predicate, in insertion order
    #[must_use]
    pub fn strings(&self, predicate: &str) -> Vec<&str> {
        self.values(predicate)
            .iter()
            .filter_map(TypedValue::as_str)
            .collect()
    }

    /// First timestamp value of a predicate
    #[must_use]
    pub fn datetime(&self, predicate: &str) -> Option<DateTime<Utc>> {
        self.values(predicate)
            .iter()
            .find_map(TypedValue::as_datetime)
    }

    /// All timestamp values of a predicate, in insertion order
    #[must_use]
    pub fn datetimes(&self, predicate: &str) -> Vec<DateTime<Utc>> {
        self.values(predicate)
            .iter()
            .filter_map(TypedValue::as_datetime)
            .collect()
    }

    /// First date value of a predicate
    #[must_use]
    pub fn date(&self, predicate: &str) -> Option<NaiveDate> {
        self.values(predicate).iter().find_map(TypedValue::as_date)
    }

    /// First integer value of a predicate
    #[must_use]
    pub fn integer(&self, predicate: &str) -> Option<i64> {
        self.values(predicate)
            .iter()
            .find_map(TypedValue::as_integer)
    }

    /// First URL value of a predicate
    #[must_use]
    pub fn url(&self, predicate: &str) -> Option<&ResourceUrl> {
        self.values(predicate).iter().find_map(TypedValue::as_url)
    }

    /// Required string attribute
    ///
    /// # Errors
    /// [`GraphError::MissingAttribute`] if absent, [`GraphError::TypeMismatch`]
    /// if recorded with another type
    pub fn require_string(&self, predicate: &str) -> Result<&str, GraphError> {
        match self.first(predicate) {
            None => Err(self.missing(predicate)),
            Some(TypedValue::String(s)) => Ok(s),
            Some(other) => Err(GraphError::TypeMismatch {
                predicate: predicate.to_string(),
                expected: ValueType::String,
                actual: other.value_type(),
            }),
        }
    }

    /// Required timestamp attribute
    ///
    /// # Errors
    /// Same as [`SubGraph::require_string`]
    pub fn require_datetime(&self, predicate: &str) -> Result<DateTime<Utc>, GraphError> {
        match self.first(predicate) {
            None => Err(self.missing(predicate)),
            Some(TypedValue::DateTime(dt)) => Ok(*dt),
            Some(other) => Err(GraphError::TypeMismatch {
                predicate: predicate.to_string(),
                expected: ValueType::DateTime,
                actual: other.value_type(),
            }),
        }
    }

    /// Iterate predicates and their values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Predicate, &[TypedValue])> {
        self.attributes.iter().map(|(p, v)| (p, v.as_slice()))
    }

    /// Number of predicates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attributes are recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn missing(&self, predicate: &str) -> GraphError {
        GraphError::MissingAttribute {
            role: self.role.fragment().to_string(),
            predicate: predicate.to_string(),
        }
    }
}

/// Fluent builder for [`SubGraph`]
///
/// Fallible steps (URLs, raw typed text) record the first error, which
/// [`SubGraphBuilder::build`] reports. Later steps are still applied so the
/// chain never has to break.
#[derive(Debug)]
#[must_use]
pub struct SubGraphBuilder {
    graph: SubGraph,
    error: Option<GraphError>,
}

impl SubGraphBuilder {
    /// Start building a sub-graph for `role`
    pub fn new(role: SubjectRole) -> Self {
        Self {
            graph: SubGraph::new(role),
            error: None,
        }
    }

    /// Start from an existing sub-graph (for amending stored records)
    pub fn from_subgraph(graph: SubGraph) -> Self {
        Self { graph, error: None }
    }

    /// Append an already-typed value
    pub fn add(mut self, predicate: impl Into<Predicate>, value: impl Into<TypedValue>) -> Self {
        self.graph.add(predicate, value);
        self
    }

    /// Replace a predicate's values with one typed value
    pub fn set(mut self, predicate: impl Into<Predicate>, value: impl Into<TypedValue>) -> Self {
        self.graph.set(predicate, value);
        self
    }

    /// Append a string
    pub fn add_string(self, predicate: impl Into<Predicate>, value: impl Into<String>) -> Self {
        self.add(predicate, TypedValue::String(value.into()))
    }

    /// Replace with a string
    pub fn set_string(self, predicate: impl Into<Predicate>, value: impl Into<String>) -> Self {
        self.set(predicate, TypedValue::String(value.into()))
    }

    /// Append a timestamp
    pub fn add_datetime(self, predicate: impl Into<Predicate>, value: DateTime<Utc>) -> Self {
        self.add(predicate, TypedValue::DateTime(value))
    }

    /// Append a date
    pub fn add_date(self, predicate: impl Into<Predicate>, value: NaiveDate) -> Self {
        self.add(predicate, TypedValue::Date(value))
    }

    /// Append an integer
    pub fn add_integer(self, predicate: impl Into<Predicate>, value: i64) -> Self {
        self.add(predicate, TypedValue::Integer(value))
    }

    /// Append a URL, validating it
    pub fn add_url(self, predicate: impl Into<Predicate>, url: &str) -> Self {
        self.add_typed(predicate, ValueType::Url, url)
    }

    /// Append raw text parsed as `value_type`
    pub fn add_typed(mut self, predicate: impl Into<Predicate>, value_type: ValueType, raw: &str) -> Self {
        match value_type.parse(raw) {
            Ok(value) => self.graph.add(predicate, value),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Finish building
    ///
    /// # Errors
    /// Returns the first error recorded by a fallible step
    pub fn build(self) -> Result<SubGraph, GraphError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.graph),
        }
    }
}

/// Ordered set of sub-graphs describing one stored resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGraph {
    subjects: Vec<SubGraph>,
}

impl AttributeGraph {
    /// Create an empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge sub-graphs into one graph; a later sub-graph with the same role
    /// replaces an earlier one
    pub fn from_subgraphs(subgraphs: impl IntoIterator<Item = SubGraph>) -> Self {
        let mut graph = Self::new();
        for sg in subgraphs {
            graph.set(sg);
        }
        graph
    }

    /// Insert or replace the sub-graph with the same role
    pub fn set(&mut self, subgraph: SubGraph) {
        match self.subjects.iter_mut().find(|s| s.role == subgraph.role) {
            Some(existing) => *existing = subgraph,
            None => self.subjects.push(subgraph),
        }
    }

    /// Sub-graph for a role
    #[must_use]
    pub fn get(&self, role: &SubjectRole) -> Option<&SubGraph> {
        self.subjects.iter().find(|s| &s.role == role)
    }

    /// Mutable sub-graph for a role
    pub fn get_mut(&mut self, role: &SubjectRole) -> Option<&mut SubGraph> {
        self.subjects.iter_mut().find(|s| &s.role == role)
    }

    /// Sub-graph for a role, or an error naming it
    ///
    /// # Errors
    /// [`GraphError::MissingSubGraph`] if the role is absent
    pub fn require(&self, role: &SubjectRole) -> Result<&SubGraph, GraphError> {
        self.get(role)
            .ok_or_else(|| GraphError::MissingSubGraph(role.fragment().to_string()))
    }

    /// Remove the sub-graph for a role
    pub fn remove(&mut self, role: &SubjectRole) -> Option<SubGraph> {
        let idx = self.subjects.iter().position(|s| &s.role == role)?;
        Some(self.subjects.remove(idx))
    }

    /// Iterate sub-graphs in order
    pub fn iter(&self) -> impl Iterator<Item = &SubGraph> {
        self.subjects.iter()
    }

    /// Number of sub-graphs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the graph has no sub-graphs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Flatten into triples with subjects `<base>#<role>`
    #[must_use]
    pub fn to_triples(&self, base: &ResourceUrl) -> Vec<Triple> {
        let mut triples = Vec::new();
        for sg in &self.subjects {
            let subject = base.with_fragment(sg.role.fragment());
            for (predicate, values) in &sg.attributes {
                for value in values {
                    triples.push(Triple {
                        subject: subject.clone(),
                        predicate: predicate.clone(),
                        object: value.clone(),
                    });
                }
            }
        }
        triples
    }

    /// Group triples into role-keyed sub-graphs
    ///
    /// The role comes from the exact fragment after `#`. Subjects without a
    /// fragment are not sub-graphs of a document and are skipped. Sub-graphs
    /// keep first-seen order.
    #[must_use]
    pub fn from_triples(triples: &[Triple]) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            let Some((_, fragment)) = triple.subject.rsplit_once('#') else {
                continue;
            };
            if fragment.is_empty() {
                continue;
            }
            let role = SubjectRole::from_fragment(fragment);
            match graph.get_mut(&role) {
                Some(sg) => sg.add(triple.predicate.clone(), triple.object.clone()),
                None => {
                    let mut sg = SubGraph::new(role);
                    sg.add(triple.predicate.clone(), triple.object.clone());
                    graph.subjects.push(sg);
                }
            }
        }
        graph
    }

    /// Serialize as N-Triples with typed literals
    ///
    /// URL values are written as IRIs; everything else as a literal tagged
    /// with its XSD datatype.
    #[must_use]
    pub fn to_ntriples(&self, base: &ResourceUrl) -> String {
        let mut out = String::new();
        for triple in self.to_triples(base) {
            let object = match &triple.object {
                TypedValue::Url(url) => format!("<{url}>"),
                other => format!(
                    "\"{}\"^^<{}>",
                    escape_literal(&other.lexical()),
                    other.value_type().datatype_iri()
                ),
            };
            // Writing into a String cannot fail
            let _ = writeln!(out, "<{}> <{}> {} .", triple.subject, triple.predicate, object);
        }
        out
    }
}

impl FromIterator<SubGraph> for AttributeGraph {
    fn from_iter<I: IntoIterator<Item = SubGraph>>(iter: I) -> Self {
        Self::from_subgraphs(iter)
    }
}

fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
