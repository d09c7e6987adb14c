//! Path-info records and batch decoding.
//!
//! Two JSON layouts are in the wild. Older Nix releases print a list:
//!
//! ```json
//! [{"path": "/nix/store/aaa-foo", "narSize": 10, "references": ["/nix/store/bbb-bar"]},
//!  {"path": "/nix/store/ccc-gone", "valid": false}]
//! ```
//!
//! Newer releases print an object keyed by path, with `null` for invalid
//! paths:
//!
//! ```json
//! {"/nix/store/aaa-foo": {"narSize": 10, "references": ["/nix/store/bbb-bar"]},
//!  "/nix/store/ccc-gone": null}
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

/// A store entry the query reported as valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidPathInfo {
    /// Absolute path of the entry.
    pub path: String,
    /// Size of the entry in bytes.
    pub nar_size: u64,
    /// Absolute paths of the entries this one references.
    pub references: Vec<String>,
}

/// One record of a path-info batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathInfo {
    Valid(ValidPathInfo),
    /// The store no longer considers this path valid.
    Invalid { path: String },
}

impl PathInfo {
    /// Convenience constructor for a valid record.
    pub fn valid<I, S>(path: impl Into<String>, nar_size: u64, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Valid(ValidPathInfo {
            path: path.into(),
            nar_size,
            references: references.into_iter().map(Into::into).collect(),
        })
    }

    /// Convenience constructor for an invalid marker.
    pub fn invalid(path: impl Into<String>) -> Self {
        Self::Invalid { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Valid(info) => &info.path,
            Self::Invalid { path } => path,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBatch {
    List(Vec<ListRecord>),
    Map(BTreeMap<String, Option<RawInfo>>),
}

#[derive(Deserialize)]
struct ListRecord {
    path: String,
    #[serde(default = "default_valid")]
    valid: bool,
    #[serde(flatten)]
    info: RawInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInfo {
    nar_size: Option<u64>,
    #[serde(default)]
    references: Vec<String>,
}

fn default_valid() -> bool {
    true
}

impl RawInfo {
    fn into_path_info(self, path: String) -> QueryResult<PathInfo> {
        let nar_size = self.nar_size.ok_or_else(|| QueryError::MissingField {
            path: path.clone(),
            field: "narSize",
        })?;
        Ok(PathInfo::Valid(ValidPathInfo {
            path,
            nar_size,
            references: self.references,
        }))
    }
}

/// Decode the JSON output of a recursive path-info query.
pub fn decode_path_info(bytes: &[u8]) -> QueryResult<Vec<PathInfo>> {
    match serde_json::from_slice::<RawBatch>(bytes)? {
        RawBatch::List(records) => records
            .into_iter()
            .map(|record| {
                if record.valid {
                    record.info.into_path_info(record.path)
                } else {
                    Ok(PathInfo::Invalid { path: record.path })
                }
            })
            .collect(),
        RawBatch::Map(records) => records
            .into_iter()
            .map(|(path, info)| match info {
                Some(info) => info.into_path_info(path),
                None => Ok(PathInfo::Invalid { path }),
            })
            .collect(),
    }
}
