//! Foundation types for storegraph.
//!
//! A content-addressed package store keeps every entry as a uniquely named
//! directory under a common root (`/nix/store` by default). This crate owns
//! the two types every other storegraph crate builds on:
//!
//! - [`StoreDir`]: the store root, and the only way to parse a path into a name
//! - [`StoreName`]: the canonical entry name (`<hash>-<name>`) of one entry

pub mod error;
pub mod name;
pub mod store_dir;

pub use error::TypeError;
pub use name::StoreName;
pub use store_dir::{StoreDir, DEFAULT_STORE_DIR, STORE_DIR_ENV};
