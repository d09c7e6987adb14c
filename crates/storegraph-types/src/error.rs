use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid store directory {path:?}: {reason}")]
    InvalidStoreDir { path: String, reason: String },
}
