//! The scoped store graph.
//!
//! A [`Graph`] is the closure of a non-empty, ordered list of roots. It is
//! built once from a single bulk query and is immutable afterwards; the only
//! way to get another graph is [`Graph::transform`] (or its cheaper sibling
//! [`Graph::map_payloads`]), which produces a new graph under the same brand.
//!
//! # Invariants
//!
//! - Every root is an entry.
//! - Every reference of every entry is an entry (the graph is total).
//! - No entry references itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use storegraph_types::{StoreDir, StoreName};

use crate::build::RawEntry;
use crate::entry::Entry;
use crate::name::Name;

/// An entry as stored in a graph: references are names.
pub type GraphEntry<'id, P> = Entry<'id, Name<'id>, P>;

/// Dependency graph of the store entries reachable from a set of roots.
#[derive(Clone, Debug)]
pub struct Graph<'id, P> {
    store_dir: StoreDir,
    entries: HashMap<StoreName, GraphEntry<'id, P>>,
    roots: Vec<Name<'id>>,
}

impl<'id> Graph<'id, ()> {
    /// Brand validated entries. `raw` must be total and contain every root.
    pub(crate) fn from_raw(
        store_dir: StoreDir,
        raw: HashMap<StoreName, RawEntry>,
        roots: Vec<StoreName>,
    ) -> Self {
        let entries = raw
            .into_iter()
            .map(|(key, entry)| {
                let refs = entry.refs.into_iter().map(Name::new).collect();
                (key, Entry::new(Name::new(entry.name), entry.size, refs, ()))
            })
            .collect();
        Self {
            store_dir,
            entries,
            roots: roots.into_iter().map(Name::new).collect(),
        }
    }
}

impl<'id, P> Graph<'id, P> {
    pub(crate) fn from_parts(
        store_dir: StoreDir,
        entries: HashMap<StoreName, GraphEntry<'id, P>>,
        roots: Vec<Name<'id>>,
    ) -> Self {
        Self {
            store_dir,
            entries,
            roots,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed graph; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store_dir(&self) -> &StoreDir {
        &self.store_dir
    }

    /// The entry for `name`.
    ///
    /// # Panics
    ///
    /// A `Name<'id>` can only come from this graph (or a graph folded from
    /// it, which has the same names), so a miss means the graph's invariants
    /// are broken and this panics rather than inventing an entry.
    pub fn lookup(&self, name: &Name<'id>) -> &GraphEntry<'id, P> {
        match self.entries.get(name.store_name()) {
            Some(entry) => entry,
            None => panic!("invariant violation: {name} belongs to this graph but has no entry"),
        }
    }

    /// Root entries in declaration order. Duplicated roots appear twice.
    pub fn roots(&self) -> Vec<&GraphEntry<'id, P>> {
        self.roots.iter().map(|name| self.lookup(name)).collect()
    }

    pub fn root_names(&self) -> &[Name<'id>] {
        &self.roots
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &GraphEntry<'id, P>> {
        self.entries.values()
    }

    pub fn contains(&self, name: &StoreName) -> bool {
        self.entries.contains_key(name)
    }

    /// Scope an unscoped name to this graph, if it is one of its entries.
    pub fn resolve(&self, name: &StoreName) -> Option<Name<'id>> {
        self.entries.get(name).map(|entry| entry.name().clone())
    }

    /// Parse a path and scope the resulting name to this graph.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Option<Name<'id>> {
        let name = self.store_dir.parse(path)?;
        self.resolve(&name)
    }

    /// Canonical absolute path of an entry.
    pub fn path_of(&self, name: &Name<'id>) -> PathBuf {
        self.store_dir.path_of(name.store_name())
    }
}
