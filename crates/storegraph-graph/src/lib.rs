//! Scoped dependency graphs over a content-addressed package store.
//!
//! A [`GraphLoader`] issues one bulk query for the closure of a set of roots
//! and hands the resulting [`Graph`] to a callback. Inside the callback the
//! graph supports:
//!
//! - [`Graph::lookup`] and [`Graph::roots`] -- direct access by scoped [`Name`]
//! - [`Graph::fetch_refs`] -- filtered, pruning reachability
//! - [`Graph::transform`] -- memoized bottom-up fold into new payloads
//! - [`stats::calculate_stats`] -- closure and added sizes per entry
//!
//! # Scoping
//!
//! The callback is generic over a brand lifetime `'id`, so names and entries
//! from one graph are rejected at compile time by any other graph, and none
//! of them can outlive the callback.
//!
//! ```no_run
//! use storegraph_graph::{GraphLoader, LoaderConfig};
//!
//! let loader = GraphLoader::from_config(LoaderConfig::from_env()?);
//! let roots = ["/nix/store/0c7s9fzj2mbxn2m6vyq1aaibw3ly2d3n-hello-2.12"];
//! let size = loader.with_graph(&roots, |graph| {
//!     graph.closure_size(graph.root_names())
//! })?;
//! println!("closure size: {size} bytes");
//! # Ok::<(), storegraph_graph::GraphError>(())
//! ```

mod build;
pub mod config;
pub mod entry;
pub mod error;
mod fold;
pub mod graph;
pub mod loader;
pub mod name;
pub mod stats;
mod traversal;

#[cfg(test)]
mod testing;

pub use config::LoaderConfig;
pub use entry::Entry;
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphEntry};
pub use loader::GraphLoader;
pub use name::Name;
pub use stats::{calculate_stats, PathStats};
