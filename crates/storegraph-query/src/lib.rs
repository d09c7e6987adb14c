//! Bulk path-info queries for storegraph.
//!
//! The graph layer never talks to a store directly. It asks a
//! [`PathInfoQuery`] for one thing: "describe, recursively, every entry
//! reachable from these paths". The answer is a batch of [`PathInfo`]
//! records, each either valid (path, size, references) or an invalid marker.
//!
//! # Backends
//!
//! - [`NixPathInfo`] -- runs a single `nix path-info --json --recursive --size`
//! - [`InMemoryPathInfo`] -- registered records, for tests and embedding
//!
//! Both layouts Nix has used for `--json` output are accepted by
//! [`decode_path_info`].

pub mod config;
pub mod error;
pub mod memory;
pub mod nix;
pub mod record;
pub mod traits;

pub use config::QueryConfig;
pub use error::{QueryError, QueryResult};
pub use memory::InMemoryPathInfo;
pub use nix::NixPathInfo;
pub use record::{decode_path_info, PathInfo, ValidPathInfo};
pub use traits::PathInfoQuery;
