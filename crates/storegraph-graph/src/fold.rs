//! Memoized bottom-up fold.
//!
//! [`Graph::transform`] replaces every payload. Entries move from `pending`
//! (not yet touched) through the explicit work stack (in progress) to `done`
//! (folded). A name is claimed from `pending` once and folded once, so the
//! callback runs exactly once per entry however many dependents share it, and
//! it runs only after every reference of the entry is in `done`.
//!
//! The walk uses an explicit stack instead of recursion, so closure depth is
//! bounded by memory rather than by the thread's stack. A reference to a name
//! that is still on the stack is a cycle; the fold stops and reports it.

use std::collections::HashMap;

use tracing::{debug, warn};

use storegraph_types::StoreName;

use crate::entry::Entry;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, GraphEntry};
use crate::name::Name;

/// One entry on the work stack, with the index of its next unfolded reference.
struct Frame<'g, 'id, A> {
    entry: &'g GraphEntry<'id, A>,
    next: usize,
}

impl<'id, A> Graph<'id, A> {
    /// Fold the graph bottom-up into a graph with new payloads.
    ///
    /// For every entry, `f` receives the entry's name, size and current
    /// payload, with references bound to the already folded entries they
    /// name. `f` is called exactly once per entry, dependencies first. The
    /// result has the same names, sizes, references and roots.
    ///
    /// Returns [`GraphError::CycleDetected`] if the references are not
    /// acyclic; the store never produces such a graph unless it is corrupt.
    pub fn transform<B, F>(&self, mut f: F) -> GraphResult<Graph<'id, B>>
    where
        F: FnMut(Entry<'id, &GraphEntry<'id, B>, &A>) -> B,
    {
        let mut pending: HashMap<&StoreName, &GraphEntry<'id, A>> =
            self.entries().map(|entry| (entry.name().store_name(), entry)).collect();
        let mut done: HashMap<StoreName, GraphEntry<'id, B>> = HashMap::with_capacity(pending.len());

        // Roots first, in declaration order; anything left over is folded
        // after them so the result always has the full key set.
        let mut starts: Vec<&Name<'id>> = self.root_names().iter().collect();
        starts.extend(self.entries().map(|entry| entry.name()));

        let mut stack: Vec<Frame<'_, 'id, A>> = Vec::new();
        for start in starts {
            if done.contains_key(start.store_name()) {
                continue;
            }
            let frame = claim(&mut pending, &stack, start)?;
            stack.push(frame);

            while let Some(frame) = stack.last_mut() {
                let entry = frame.entry;
                if let Some(next) = entry.refs().get(frame.next) {
                    frame.next += 1;
                    if !done.contains_key(next.store_name()) {
                        let child = claim(&mut pending, &stack, next)?;
                        stack.push(child);
                    }
                    continue;
                }

                stack.pop();
                let folded = fold_entry(entry, &done, &mut f);
                done.insert(entry.name().store_name().clone(), folded);
            }
        }

        debug!(entries = done.len(), "folded graph");
        Ok(Graph::from_parts(
            self.store_dir().clone(),
            done,
            self.root_names().to_vec(),
        ))
    }

    /// Replace every payload without looking at references.
    pub fn map_payloads<B, F>(&self, mut f: F) -> Graph<'id, B>
    where
        F: FnMut(&GraphEntry<'id, A>) -> B,
    {
        let entries = self
            .entries()
            .map(|entry| {
                let mapped = Entry::new(
                    entry.name().clone(),
                    entry.size(),
                    entry.refs().to_vec(),
                    f(entry),
                );
                (entry.name().store_name().clone(), mapped)
            })
            .collect();
        Graph::from_parts(self.store_dir().clone(), entries, self.root_names().to_vec())
    }
}

/// Move `name` from `pending` onto the work stack.
fn claim<'g, 'id, A>(
    pending: &mut HashMap<&'g StoreName, &'g GraphEntry<'id, A>>,
    stack: &[Frame<'g, 'id, A>],
    name: &Name<'id>,
) -> GraphResult<Frame<'g, 'id, A>> {
    if let Some(entry) = pending.remove(name.store_name()) {
        return Ok(Frame { entry, next: 0 });
    }

    // Not pending and not done: it must be in progress further down the stack.
    let Some(position) = stack.iter().position(|frame| frame.entry.name() == name) else {
        panic!("invariant violation: {name} is neither pending, in progress, nor folded");
    };
    let mut cycle: Vec<String> = stack[position..]
        .iter()
        .map(|frame| frame.entry.name().to_string())
        .collect();
    cycle.push(name.to_string());
    warn!(cycle = %cycle.join(" -> "), "reference cycle in store graph");
    Err(GraphError::CycleDetected { cycle })
}

/// Run `f` on `entry` with its references bound to their folded entries.
fn fold_entry<'id, A, B, F>(
    entry: &GraphEntry<'id, A>,
    done: &HashMap<StoreName, GraphEntry<'id, B>>,
    f: &mut F,
) -> GraphEntry<'id, B>
where
    F: FnMut(Entry<'id, &GraphEntry<'id, B>, &A>) -> B,
{
    let refs: Vec<&GraphEntry<'id, B>> = entry
        .refs()
        .iter()
        .map(|name| match done.get(name.store_name()) {
            Some(folded) => folded,
            None => panic!("invariant violation: {name} folded after its dependent"),
        })
        .collect();
    let view = Entry::new(entry.name().clone(), entry.size(), refs, entry.payload());
    let payload = f(view);
    Entry::new(
        entry.name().clone(),
        entry.size(),
        entry.refs().to_vec(),
        payload,
    )
}
