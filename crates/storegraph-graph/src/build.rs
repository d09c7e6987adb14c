//! Turning one bulk query into validated, unscoped entries.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info};

use storegraph_query::{PathInfo, PathInfoQuery, ValidPathInfo};
use storegraph_types::{StoreDir, StoreName};

use crate::error::{GraphError, GraphResult};

/// An entry before it is branded into a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawEntry {
    pub(crate) name: StoreName,
    pub(crate) size: u64,
    pub(crate) refs: Vec<StoreName>,
}

/// Query the closure of `roots` and validate it into a total entry map.
///
/// Exactly one query is issued. The batch is rejected as a whole if any record
/// is invalid, if any returned path fails to parse (all offenders are
/// reported together), or if a reference or root is missing from the batch.
pub(crate) fn load_entries<Q>(
    query: &Q,
    store_dir: &StoreDir,
    roots: &[StoreName],
) -> GraphResult<HashMap<StoreName, RawEntry>>
where
    Q: PathInfoQuery + ?Sized,
{
    let paths: Vec<PathBuf> = roots.iter().map(|root| store_dir.path_of(root)).collect();
    let records = query.query_closure(&paths)?;
    info!(roots = roots.len(), records = records.len(), "queried store closure");

    let mut valid = Vec::with_capacity(records.len());
    for record in records {
        match record {
            PathInfo::Valid(info) => valid.push(info),
            PathInfo::Invalid { path } => return Err(GraphError::InvalidEntry { path }),
        }
    }

    let mut unparsable = Vec::new();
    let mut entries = HashMap::with_capacity(valid.len());
    for info in valid {
        if let Some(entry) = to_raw_entry(store_dir, info, &mut unparsable) {
            entries.insert(entry.name.clone(), entry);
        }
    }
    if !unparsable.is_empty() {
        unparsable.sort();
        unparsable.dedup();
        return Err(GraphError::UnparsableNames(unparsable));
    }

    for entry in entries.values() {
        if let Some(missing) = entry.refs.iter().find(|r| !entries.contains_key(*r)) {
            return Err(GraphError::DanglingReference {
                entry: entry.name.to_string(),
                reference: missing.to_string(),
            });
        }
    }
    if let Some(missing) = roots.iter().find(|root| !entries.contains_key(*root)) {
        return Err(GraphError::MissingRoot(missing.to_string()));
    }

    debug!(entries = entries.len(), "validated store closure");
    Ok(entries)
}

/// Parse one record, pushing every path that fails to parse onto `unparsable`.
fn to_raw_entry(
    store_dir: &StoreDir,
    info: ValidPathInfo,
    unparsable: &mut Vec<String>,
) -> Option<RawEntry> {
    let name = store_dir.parse(&info.path);
    if name.is_none() {
        unparsable.push(info.path.clone());
    }

    let mut refs = Vec::with_capacity(info.references.len());
    for reference in info.references {
        match store_dir.parse(&reference) {
            Some(parsed) if Some(&parsed) == name.as_ref() => {}
            Some(parsed) => refs.push(parsed),
            None => unparsable.push(reference),
        }
    }

    Some(RawEntry {
        name: name?,
        size: info.nar_size,
        refs,
    })
}
