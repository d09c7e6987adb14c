//! The store root and path parsing.
//!
//! A path names a store entry iff its segments begin exactly with the
//! segments of the store root, followed by one plain entry-name segment.
//! Anything after the entry name (`/nix/store/<name>/bin/hello`) is ignored.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::name::StoreName;

/// Store root used when nothing else is configured.
pub const DEFAULT_STORE_DIR: &str = "/nix/store";

/// Environment variable that overrides the store root.
pub const STORE_DIR_ENV: &str = "NIX_STORE_DIR";

/// Absolute, normalized path of a store root.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct StoreDir {
    path: PathBuf,
}

impl StoreDir {
    /// Validate and normalize a store root.
    ///
    /// The path must be absolute and consist only of plain directory names
    /// (no `.` or `..`). Repeated and trailing slashes are dropped.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, TypeError> {
        let path = path.into();
        let invalid = |reason: &str| TypeError::InvalidStoreDir {
            path: path.display().to_string(),
            reason: reason.into(),
        };

        let mut components = path.components();
        if components.next() != Some(Component::RootDir) {
            return Err(invalid("must be an absolute path"));
        }

        let mut normalized = PathBuf::from("/");
        for component in components {
            match component {
                Component::Normal(segment) => normalized.push(segment),
                _ => return Err(invalid("must contain only plain directory names")),
            }
        }
        if normalized.parent().is_none() {
            return Err(invalid("must not be the filesystem root"));
        }

        Ok(Self { path: normalized })
    }

    /// Store root from `NIX_STORE_DIR`, falling back to `/nix/store`.
    pub fn from_env() -> Result<Self, TypeError> {
        match std::env::var_os(STORE_DIR_ENV) {
            Some(value) if !value.is_empty() => Self::new(PathBuf::from(value)),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Parse a path into the name of the store entry it lies in.
    ///
    /// The `/`-separated segments of `path` must start with exactly the
    /// segments of the store root, followed by the entry name. Empty segments
    /// (repeated slashes) are skipped; `.` and `..` are never normalized away,
    /// so a path that spells one before the entry name is rejected.
    ///
    /// Returns `None` when the path is not under this store root or has no
    /// entry-name component. Callers must reject such input.
    pub fn parse(&self, path: impl AsRef<Path>) -> Option<StoreName> {
        let text = path.as_ref().to_str()?;
        let mut segments = text.strip_prefix('/')?.split('/').filter(|s| !s.is_empty());
        for component in self.path.components().skip(1) {
            if OsStr::new(segments.next()?) != component.as_os_str() {
                return None;
            }
        }
        StoreName::from_segment(segments.next()?)
    }

    /// Canonical absolute path of an entry. Inverse of [`parse`](Self::parse).
    pub fn path_of(&self, name: &StoreName) -> PathBuf {
        self.path.join(name.as_str())
    }
}

impl Default for StoreDir {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

impl TryFrom<PathBuf> for StoreDir {
    type Error = TypeError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl From<StoreDir> for PathBuf {
    fn from(dir: StoreDir) -> Self {
        dir.path
    }
}

impl fmt::Debug for StoreDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreDir({})", self.path.display())
    }
}

impl fmt::Display for StoreDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
