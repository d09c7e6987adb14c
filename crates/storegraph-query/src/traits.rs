use std::path::PathBuf;

use crate::error::QueryResult;
use crate::record::PathInfo;

/// A bulk, recursive path-info query against a store.
///
/// Implementations must satisfy these rules:
/// - One call is one query. The caller never retries; backends that want
///   retries do them internally.
/// - The answer covers the full transitive closure of `paths`, including
///   the requested paths themselves.
/// - Entries the store no longer considers valid are reported as
///   [`PathInfo::Invalid`], not silently dropped.
/// - Transport or decode failures are errors, never partial batches.
pub trait PathInfoQuery: Send + Sync {
    /// Describe every entry reachable from `paths`.
    fn query_closure(&self, paths: &[PathBuf]) -> QueryResult<Vec<PathInfo>>;
}

impl<T: PathInfoQuery + ?Sized> PathInfoQuery for &T {
    fn query_closure(&self, paths: &[PathBuf]) -> QueryResult<Vec<PathInfo>> {
        (**self).query_closure(paths)
    }
}
