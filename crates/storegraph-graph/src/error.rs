//! Error types for graph construction and folding.

use storegraph_query::QueryError;
use storegraph_types::TypeError;

/// Errors that can occur while building or folding a graph.
///
/// Construction errors are all-or-nothing: when one is returned, no graph was
/// handed to the caller's callback.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// One or more requested roots are not under the store root.
    #[error("not store paths: {}", .0.join(", "))]
    InvalidRoots(Vec<String>),

    /// No roots were requested.
    #[error("at least one root is required")]
    EmptyRoots,

    /// The query backend failed or its output did not decode.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),

    /// The store reported an entry as no longer valid.
    #[error("store entry is no longer valid: {path}")]
    InvalidEntry { path: String },

    /// Paths returned by the query backend that are not store paths.
    #[error("query returned unparsable store paths: {}", .0.join(", "))]
    UnparsableNames(Vec<String>),

    /// An entry references a name that is not part of the returned closure.
    #[error("dangling reference: {entry} references missing {reference}")]
    DanglingReference {
        /// The entry containing the bad reference.
        entry: String,
        /// The missing target.
        reference: String,
    },

    /// A requested root is missing from the returned closure.
    #[error("query result does not contain root {0}")]
    MissingRoot(String),

    /// The references form a cycle, which the store never should.
    #[error("reference cycle: {}", .cycle.join(" -> "))]
    CycleDetected {
        /// Names along the cycle; the first name is repeated at the end.
        cycle: Vec<String>,
    },

    /// Store root configuration is invalid.
    #[error("invalid store root: {0}")]
    Type(#[from] TypeError),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;
