//! The scoped entry point.

use tracing::{debug, warn};

use storegraph_query::{NixPathInfo, PathInfoQuery};
use storegraph_types::{StoreDir, StoreName};

use crate::build::load_entries;
use crate::config::LoaderConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Builds graphs from a store root and a query backend.
#[derive(Clone, Debug)]
pub struct GraphLoader<Q> {
    store_dir: StoreDir,
    query: Q,
}

impl GraphLoader<NixPathInfo> {
    /// A loader that queries the local store through `nix path-info`.
    pub fn from_config(config: LoaderConfig) -> Self {
        Self::new(config.store_dir, NixPathInfo::new(config.query))
    }
}

impl<Q: PathInfoQuery> GraphLoader<Q> {
    pub fn new(store_dir: StoreDir, query: Q) -> Self {
        Self { store_dir, query }
    }

    pub fn store_dir(&self) -> &StoreDir {
        &self.store_dir
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Parse every root, reporting all offenders at once.
    pub fn parse_roots<S: AsRef<str>>(&self, roots: &[S]) -> GraphResult<Vec<StoreName>> {
        let mut parsed = Vec::with_capacity(roots.len());
        let mut invalid = Vec::new();
        for root in roots {
            match self.store_dir.parse(root.as_ref()) {
                Some(name) => parsed.push(name),
                None => invalid.push(root.as_ref().to_string()),
            }
        }

        if !invalid.is_empty() {
            warn!(invalid = invalid.len(), "rejected roots outside the store");
            return Err(GraphError::InvalidRoots(invalid));
        }
        if parsed.is_empty() {
            return Err(GraphError::EmptyRoots);
        }
        Ok(parsed)
    }

    /// Build the graph of everything reachable from `roots` and hand it to `f`.
    ///
    /// All roots are validated before anything is queried; if any fails to
    /// parse, the full list of offenders is returned and no query is issued.
    /// Otherwise one bulk query is made, the graph is assembled, and `f`'s
    /// result is returned. `f` is never called when construction fails.
    ///
    /// `f` must work for any brand `'id`, which is what keeps the graph, its
    /// names and its entries from escaping the callback or being mixed with
    /// another graph.
    pub fn with_graph<S, R, F>(&self, roots: &[S], f: F) -> GraphResult<R>
    where
        S: AsRef<str>,
        F: for<'id> FnOnce(Graph<'id, ()>) -> R,
    {
        let roots = self.parse_roots(roots)?;
        let entries = load_entries(&self.query, &self.store_dir, &roots)?;
        debug!(roots = roots.len(), entries = entries.len(), "graph ready");
        Ok(f(Graph::from_raw(self.store_dir.clone(), entries, roots)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{loader, path, query_from};
    use storegraph_query::InMemoryPathInfo;

    #[test]
    fn all_invalid_roots_are_reported_without_querying() {
        let query = query_from(&[("aaa-foo", 10, "")]);
        let roots = ["/usr/bin/env", "relative/path", "/nix/store/aaa-foo"];
        let err = loader(&query).with_graph(&roots, |_| ()).unwrap_err();
        match err {
            GraphError::InvalidRoots(bad) => assert_eq!(bad, roots),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(query.query_count(), 0);
    }

    #[test]
    fn partially_invalid_roots_issue_no_query() {
        let query = query_from(&[("aaa-foo", 10, "")]);
        let roots = [path("aaa-foo"), "/tmp/x".to_string()];
        let mut called = false;
        let err = loader(&query)
            .with_graph(&roots, |_| called = true)
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRoots(ref bad) if bad == &["/tmp/x"]));
        assert!(!called);
        assert_eq!(query.query_count(), 0);
    }

    #[test]
    fn empty_roots_are_rejected() {
        let query = InMemoryPathInfo::new();
        let err = loader(&query)
            .with_graph(&[] as &[&str], |_| ())
            .unwrap_err();
        assert!(matches!(err, GraphError::EmptyRoots));
        assert_eq!(query.query_count(), 0);
    }

    #[test]
    fn invalid_entry_prevents_the_callback() {
        let query = InMemoryPathInfo::new();
        let refs: Vec<String> = (0..999).map(|i| path(&format!("{i:04}-dep"))).collect();
        for r in &refs {
            query.insert_valid(r.clone(), 1, Vec::<String>::new());
        }
        query.insert_valid(path("aaa-root"), 1, refs.iter().cloned().chain([path("zzz-gone")]));
        query.insert_invalid(path("zzz-gone"));

        let mut called = false;
        let err = loader(&query)
            .with_graph(&[path("aaa-root")], |_| called = true)
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidEntry { ref path } if path == "/store/zzz-gone"));
        assert!(!called);
        assert_eq!(query.query_count(), 1);
    }

    #[test]
    fn one_query_for_many_roots() {
        let query = query_from(&[
            ("aaa-foo", 10, "ccc-shared"),
            ("bbb-bar", 20, "ccc-shared"),
            ("ccc-shared", 5, ""),
        ]);
        let len = loader(&query)
            .with_graph(&[path("aaa-foo"), path("bbb-bar")], |graph| graph.len())
            .unwrap();
        assert_eq!(len, 3);
        assert_eq!(query.query_count(), 1);
    }

    #[test]
    fn end_to_end() {
        let query = query_from(&[("aaa-foo", 10, "bbb-bar"), ("bbb-bar", 20, "")]);
        let loader = GraphLoader::new(StoreDir::new("/store").unwrap(), &query);
        let (roots, closure, sizes) = loader
            .with_graph(&["/store/aaa-foo"], |graph| {
                let roots: Vec<(String, u64, Vec<String>)> = graph
                    .roots()
                    .iter()
                    .map(|e| {
                        let refs = e.refs().iter().map(|r| r.to_string()).collect();
                        (e.name().to_string(), e.size(), refs)
                    })
                    .collect();

                let mut closure: Vec<String> = graph
                    .fetch_refs(|_| true, graph.root_names())
                    .iter()
                    .map(|e| e.name().to_string())
                    .collect();
                closure.sort();

                let folded = graph
                    .transform::<u64, _>(|e| e.size() + e.refs().iter().map(|r| *r.payload()).sum::<u64>())
                    .unwrap();
                let mut sizes: Vec<(String, u64)> = folded
                    .entries()
                    .map(|e| (e.name().to_string(), *e.payload()))
                    .collect();
                sizes.sort();

                (roots, closure, sizes)
            })
            .unwrap();

        assert_eq!(
            roots,
            vec![("aaa-foo".to_string(), 10, vec!["bbb-bar".to_string()])]
        );
        assert_eq!(closure, ["aaa-foo", "bbb-bar"]);
        assert_eq!(
            sizes,
            vec![("aaa-foo".to_string(), 30), ("bbb-bar".to_string(), 20)]
        );
    }
}
