//! Access-control errors

use pass_graph::GraphError;

/// Errors raised while reading or exporting access-control graphs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// Underlying graph construction failed
    #[error("acl graph error: {0}")]
    Graph(#[from] GraphError),

    /// Authorization names neither an agent nor an agent class
    #[error("authorization {0} names no agent")]
    MissingAgent(String),

    /// Authorization covers neither the resource nor its members
    #[error("authorization {0} has no target")]
    MissingTarget(String),

    /// Authorization targets a resource other than the one being read
    #[error("authorization targets {actual}, expected {expected}")]
    ForeignTarget {
        /// Resource the graph was read for
        expected: String,
        /// Resource named by the authorization
        actual: String,
    },

    /// Agent class other than the public class
    #[error("unsupported agent class: {0}")]
    UnsupportedAgentClass(String),

    /// Mode IRI that is not read/append/write/control
    #[error("unknown access mode: {0}")]
    UnknownMode(String),
}
