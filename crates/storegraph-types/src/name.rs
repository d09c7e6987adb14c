use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Canonical name of one store entry, e.g. `0c7s9...-hello-2.12`.
///
/// A `StoreName` is the first path segment below the store root. It can only
/// be obtained through [`StoreDir::parse`](crate::StoreDir::parse), so every
/// value in circulation came from a path that really was under a store root.
/// Equality, ordering and hashing all go by the name text.
///
/// Cloning is cheap: the text is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreName {
    text: Arc<str>,
}

impl StoreName {
    /// Build a name from a single, already validated path segment.
    pub(crate) fn from_segment(segment: &str) -> Option<Self> {
        if matches!(segment, "" | "." | "..") || segment.contains('/') {
            return None;
        }
        Some(Self {
            text: Arc::from(segment),
        })
    }

    /// The raw entry name, including the leading content hash.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The entry name with the leading `<hash>-` stripped, for display.
    ///
    /// Names without a `-` are returned whole.
    pub fn short_name(&self) -> &str {
        match self.text.split_once('-') {
            Some((_, rest)) => rest,
            None => &self.text,
        }
    }

    /// The content hash segment before the first `-`, if the name has one.
    pub fn hash_part(&self) -> Option<&str> {
        self.text.split_once('-').map(|(hash, _)| hash)
    }
}

impl fmt::Debug for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreName({})", self.text)
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for StoreName {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Borrow<str> for StoreName {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl Serialize for StoreName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
