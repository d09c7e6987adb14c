//! Shared fixtures for unit tests.

use storegraph_query::InMemoryPathInfo;
use storegraph_types::StoreDir;

use crate::loader::GraphLoader;

pub(crate) fn store_dir() -> StoreDir {
    StoreDir::new("/store").unwrap()
}

pub(crate) fn path(name: &str) -> String {
    format!("/store/{name}")
}

/// Backend holding `(name, size, space-separated references)` entries.
pub(crate) fn query_from(entries: &[(&str, u64, &str)]) -> InMemoryPathInfo {
    let query = InMemoryPathInfo::new();
    for (name, size, refs) in entries {
        query.insert_valid(path(name), *size, refs.split_whitespace().map(path));
    }
    query
}

pub(crate) fn loader(query: &InMemoryPathInfo) -> GraphLoader<&InMemoryPathInfo> {
    GraphLoader::new(store_dir(), query)
}
