//! Per-entry size statistics.
//!
//! - closure size: bytes in the entry's closure, each entry counted once
//! - added size: bytes that are in the roots' closure only because of this
//!   entry, i.e. that would disappear if the walk were pruned at it
//! - immediate parents: entries that reference this one directly

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use storegraph_types::StoreName;

use crate::error::GraphResult;
use crate::graph::Graph;
use crate::name::Name;

/// Size statistics for one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathStats {
    pub closure_size: u64,
    pub added_size: u64,
    /// Sorted by name.
    pub immediate_parents: Vec<StoreName>,
}

/// Compute [`PathStats`] for every entry of `graph`.
pub fn calculate_stats<'id, P>(graph: &Graph<'id, P>) -> GraphResult<Graph<'id, PathStats>> {
    let total = graph.closure_size(graph.root_names());
    let parents = immediate_parents(graph);

    let closures = graph.transform::<HashSet<Name<'id>>, _>(|entry| {
        let mut closure = HashSet::new();
        closure.insert(entry.name().clone());
        for dep in entry.refs() {
            closure.extend(dep.payload().iter().cloned());
        }
        closure
    })?;

    Ok(closures.map_payloads(|entry| {
        let closure_size = entry
            .payload()
            .iter()
            .map(|name| graph.lookup(name).size())
            .sum();
        let remaining: u64 = graph
            .fetch_refs(|other| other.name() != entry.name(), graph.root_names())
            .iter()
            .map(|other| other.size())
            .sum();
        PathStats {
            closure_size,
            added_size: total - remaining,
            immediate_parents: parents.get(entry.name()).cloned().unwrap_or_default(),
        }
    }))
}

fn immediate_parents<'g, 'id, P>(graph: &'g Graph<'id, P>) -> HashMap<&'g Name<'id>, Vec<StoreName>> {
    let mut parents: HashMap<&Name<'id>, Vec<StoreName>> = HashMap::new();
    for entry in graph.entries() {
        for dep in entry.refs() {
            parents
                .entry(dep)
                .or_default()
                .push(entry.name().store_name().clone());
        }
    }
    for list in parents.values_mut() {
        list.sort();
        list.dedup();
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{loader, path, query_from};

    fn stats_by_name(entries: &[(&str, u64, &str)], roots: &[&str]) -> HashMap<String, PathStats> {
        let query = query_from(entries);
        let roots: Vec<String> = roots.iter().map(|r| path(r)).collect();
        loader(&query)
            .with_graph(&roots, |graph| {
                let stats = calculate_stats(&graph).unwrap();
                stats
                    .entries()
                    .map(|e| (e.name().to_string(), e.payload().clone()))
                    .collect()
            })
            .unwrap()
    }

    fn parents(stats: &PathStats) -> Vec<&str> {
        stats.immediate_parents.iter().map(StoreName::as_str).collect()
    }

    #[test]
    fn diamond_statistics() {
        let stats = stats_by_name(
            &[
                ("ddd-top", 8, "bbb-left ccc-right"),
                ("bbb-left", 2, "aaa-base"),
                ("ccc-right", 4, "aaa-base"),
                ("aaa-base", 1, ""),
            ],
            &["ddd-top"],
        );

        assert_eq!(stats["aaa-base"].closure_size, 1);
        assert_eq!(stats["bbb-left"].closure_size, 3);
        assert_eq!(stats["ccc-right"].closure_size, 5);
        assert_eq!(stats["ddd-top"].closure_size, 15);

        // The shared base is kept alive by either side, so removing one side
        // frees only that side's own bytes.
        assert_eq!(stats["aaa-base"].added_size, 1);
        assert_eq!(stats["bbb-left"].added_size, 2);
        assert_eq!(stats["ccc-right"].added_size, 4);
        assert_eq!(stats["ddd-top"].added_size, 15);

        assert_eq!(parents(&stats["aaa-base"]), ["bbb-left", "ccc-right"]);
        assert_eq!(parents(&stats["bbb-left"]), ["ddd-top"]);
        assert!(stats["ddd-top"].immediate_parents.is_empty());
    }

    #[test]
    fn exclusive_dependencies_count_towards_added_size() {
        let stats = stats_by_name(
            &[
                ("aaa-app", 1, "bbb-lib"),
                ("bbb-lib", 10, "ccc-only-lib"),
                ("ccc-only-lib", 100, ""),
                ("ddd-tool", 1000, "eee-shared"),
                ("eee-shared", 5, ""),
            ],
            &["aaa-app", "ddd-tool"],
        );
        assert_eq!(stats["bbb-lib"].added_size, 110);
        assert_eq!(stats["aaa-app"].added_size, 111);
        assert_eq!(stats["eee-shared"].added_size, 5);
        assert_eq!(stats["ddd-tool"].added_size, 1005);
    }

    #[test]
    fn serializes_to_json() {
        let stats = stats_by_name(&[("aaa-app", 1, "bbb-lib"), ("bbb-lib", 2, "")], &["aaa-app"]);
        let json = serde_json::to_value(&stats["bbb-lib"]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "closure_size": 2,
                "added_size": 2,
                "immediate_parents": ["aaa-app"],
            })
        );
    }
}
