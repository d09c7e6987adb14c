/// Errors from path-info queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The batch output is not one of the recognised JSON layouts.
    #[error("failed to decode path-info batch: {0}")]
    Decode(#[from] serde_json::Error),

    /// A valid record lacks a field the graph needs.
    #[error("path-info record for {path} is missing `{field}`")]
    MissingField { path: String, field: &'static str },

    /// The query program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The query program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The backend configuration is not valid TOML for [`QueryConfig`](crate::QueryConfig).
    #[error("invalid query configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
