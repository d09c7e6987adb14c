use crate::name::Name;

/// One store entry in a graph.
///
/// `R` is the reference type: [`Name`] for entries stored in a graph, and a
/// borrowed, already folded entry inside [`Graph::transform`](crate::Graph::transform).
/// `P` is the caller's payload. The reference list never contains the entry's
/// own name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<'id, R, P> {
    name: Name<'id>,
    size: u64,
    refs: Vec<R>,
    payload: P,
}

impl<'id, R, P> Entry<'id, R, P> {
    pub(crate) fn new(name: Name<'id>, size: u64, refs: Vec<R>, payload: P) -> Self {
        Self {
            name,
            size,
            refs,
            payload,
        }
    }

    pub fn name(&self) -> &Name<'id> {
        &self.name
    }

    /// Size of the entry in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn refs(&self) -> &[R] {
        &self.refs
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}
