use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::QueryResult;
use crate::record::PathInfo;
use crate::traits::PathInfoQuery;

/// In-memory path-info backend.
///
/// Intended for tests and embedding. Records are registered up front and the
/// closure is computed breadth-first from the requested paths. A requested or
/// referenced path with no registered record is reported as invalid, which is
/// what a real store does for a path it does not know.
pub struct InMemoryPathInfo {
    records: RwLock<HashMap<String, PathInfo>>,
    queries: AtomicUsize,
}

impl InMemoryPathInfo {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Register a record, replacing any previous record for the same path.
    pub fn insert(&self, record: PathInfo) {
        let mut map = self.records.write().expect("lock poisoned");
        map.insert(record.path().to_string(), record);
    }

    /// Register a valid entry.
    pub fn insert_valid<I, S>(&self, path: impl Into<String>, nar_size: u64, references: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(PathInfo::valid(path, nar_size, references));
    }

    /// Register a path the store reports as no longer valid.
    pub fn insert_invalid(&self, path: impl Into<String>) {
        self.insert(PathInfo::invalid(path));
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Number of queries answered so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryPathInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl PathInfoQuery for InMemoryPathInfo {
    fn query_closure(&self, paths: &[PathBuf]) -> QueryResult<Vec<PathInfo>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let map = self.records.read().expect("lock poisoned");

        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for path in paths {
            let path = path.to_string_lossy().into_owned();
            if seen.insert(path.clone()) {
                queue.push_back(path);
            }
        }

        let mut batch = Vec::new();
        while let Some(path) = queue.pop_front() {
            let record = match map.get(&path) {
                Some(record) => record.clone(),
                None => PathInfo::Invalid { path },
            };
            if let PathInfo::Valid(info) = &record {
                for reference in &info.references {
                    if seen.insert(reference.clone()) {
                        queue.push_back(reference.clone());
                    }
                }
            }
            batch.push(record);
        }

        Ok(batch)
    }
}

impl std::fmt::Debug for InMemoryPathInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPathInfo")
            .field("record_count", &self.len())
            .field("query_count", &self.query_count())
            .finish()
    }
}
