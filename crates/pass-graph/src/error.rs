//! Error types for graph construction and parsing

use crate::value::ValueType;

/// Errors raised while building or reading attribute graphs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Raw text does not parse as the tagged type
    #[error("invalid {expected} value: {raw:?}")]
    InvalidValue {
        /// Type the value was tagged with
        expected: ValueType,
        /// Offending raw text
        raw: String,
    },

    /// URL is not absolute http(s)
    #[error("invalid url: {0:?}")]
    InvalidUrl(String),

    /// Predicate identifier is empty or contains whitespace
    #[error("invalid predicate: {0:?}")]
    InvalidPredicate(String),

    /// Sub-graph name is empty or not a plain fragment
    #[error("invalid sub-graph name: {0:?}")]
    InvalidRole(String),

    /// A required sub-graph was not present in the graph
    #[error("missing sub-graph: {0}")]
    MissingSubGraph(String),

    /// A required attribute was not recorded on a sub-graph
    #[error("missing attribute {predicate} on {role}")]
    MissingAttribute {
        /// Sub-graph role name
        role: String,
        /// Predicate IRI
        predicate: String,
    },

    /// Attribute present but holding the wrong type
    #[error("attribute {predicate} holds {actual}, expected {expected}")]
    TypeMismatch {
        /// Predicate IRI
        predicate: String,
        /// Expected type
        expected: ValueType,
        /// Type actually stored
        actual: ValueType,
    },
}
