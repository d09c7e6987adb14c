//! Reachability queries.
//!
//! [`Graph::fetch_refs`] is the primitive: a depth-first walk with a single
//! visited set shared by all start names, where the predicate both filters
//! the result and prunes the walk. Each name is processed at most once, so
//! the walk terminates and emits each entry once even on graphs with shared
//! dependencies or (corrupt) cycles.

use std::collections::{HashMap, HashSet, VecDeque};

use storegraph_types::StoreName;

use crate::graph::{Graph, GraphEntry};
use crate::name::Name;

impl<'id, P> Graph<'id, P> {
    /// Entries reachable from `start` through entries accepted by `predicate`.
    ///
    /// An entry rejected by the predicate is left out of the result and its
    /// references are not followed through it. The order of the result is
    /// unspecified; no entry appears twice.
    pub fn fetch_refs<F>(&self, mut predicate: F, start: &[Name<'id>]) -> Vec<&GraphEntry<'id, P>>
    where
        F: FnMut(&GraphEntry<'id, P>) -> bool,
    {
        let mut visited: HashSet<&StoreName> = HashSet::new();
        let mut result = Vec::new();
        let mut stack: Vec<&Name<'id>> = Vec::new();

        for name in start {
            stack.push(name);
            while let Some(current) = stack.pop() {
                if !visited.insert(current.store_name()) {
                    continue;
                }
                let entry = self.lookup(current);
                if !predicate(entry) {
                    continue;
                }
                result.push(entry);
                // Reversed so the first reference is walked first.
                stack.extend(entry.refs().iter().rev());
            }
        }

        result
    }

    /// Every entry reachable from `start`, including the start entries.
    pub fn closure_of(&self, start: &[Name<'id>]) -> Vec<&GraphEntry<'id, P>> {
        self.fetch_refs(|_| true, start)
    }

    /// Total size in bytes of the closure of `start`, each entry counted once.
    pub fn closure_size(&self, start: &[Name<'id>]) -> u64 {
        self.closure_of(start).iter().map(|entry| entry.size()).sum()
    }

    /// A shortest reference chain from `from` to `to`, both ends included.
    ///
    /// Returns `None` if `to` is not reachable from `from`.
    pub fn why_depends(&self, from: &Name<'id>, to: &Name<'id>) -> Option<Vec<Name<'id>>> {
        let mut predecessors: HashMap<&Name<'id>, &Name<'id>> = HashMap::new();
        let mut visited: HashSet<&Name<'id>> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut chain = vec![current.clone()];
                let mut cursor = current;
                while let Some(prev) = predecessors.get(cursor) {
                    chain.push((*prev).clone());
                    cursor = *prev;
                }
                chain.reverse();
                return Some(chain);
            }

            for next in self.lookup(current).refs() {
                if visited.insert(next) {
                    predecessors.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}
