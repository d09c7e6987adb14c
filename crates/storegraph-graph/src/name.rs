//! Names scoped to a single graph.
//!
//! Every [`Graph`](crate::Graph) is created inside a callback that is generic
//! over a lifetime `'id`. The lifetime is invariant and never unified with
//! anything else, so it acts as a compile-time brand: a `Name<'id>` from one
//! graph cannot be passed to another graph's methods.
//!
//! ```compile_fail
//! # use storegraph_graph::{GraphLoader, Name};
//! # use storegraph_query::InMemoryPathInfo;
//! # use storegraph_types::StoreDir;
//! let query = InMemoryPathInfo::new();
//! query.insert_valid("/nix/store/aaa-foo", 1, Vec::<String>::new());
//! let loader = GraphLoader::new(StoreDir::default(), &query);
//! loader.with_graph(&["/nix/store/aaa-foo"], |outer| {
//!     let name = outer.root_names()[0].clone();
//!     loader.with_graph(&["/nix/store/aaa-foo"], |inner| {
//!         inner.lookup(&name);
//!     })
//! });
//! ```

use std::fmt;
use std::marker::PhantomData;

use storegraph_types::StoreName;

/// Invariant lifetime marker. Carries no data.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Brand<'id>(PhantomData<fn(&'id ()) -> &'id ()>);

/// A [`StoreName`] known to be an entry of the graph branded `'id`.
///
/// Only the graph hands these out: root names, entry references, and
/// [`Graph::resolve`](crate::Graph::resolve).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name<'id> {
    name: StoreName,
    brand: Brand<'id>,
}

impl<'id> Name<'id> {
    pub(crate) fn new(name: StoreName) -> Self {
        Self {
            name,
            brand: Brand::default(),
        }
    }

    pub fn store_name(&self) -> &StoreName {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    pub fn short_name(&self) -> &str {
        self.name.short_name()
    }

    /// Drop the scope, keeping the plain name.
    pub fn into_store_name(self) -> StoreName {
        self.name
    }
}

impl fmt::Debug for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.name)
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name, f)
    }
}
