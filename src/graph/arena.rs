use super::search::Chain;

/// Handle of a vertex record in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VertexId(pub(crate) usize);

/// Handle of an arc record in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ArcId(pub(crate) usize);

/// Growable table with slot reuse.
///
/// Removal vacates a slot and pushes it on the free list; the next insert
/// takes the most recently freed slot.
#[derive(Debug)]
pub(crate) struct Slab<T> {
    entries: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Slab<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> usize {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            self.entries[index] = Some(value);
            index
        } else {
            self.entries.push(Some(value));
            self.entries.len() - 1
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).and_then(Option::as_mut)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.entries.get_mut(index)?.take()?;
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.free.clear();
        self.len = 0;
    }
}

/// A vertex and the head/tail of its outgoing arc list.
#[derive(Debug)]
pub(crate) struct VertexEntry<P> {
    pub(crate) key: u32,
    pub(crate) payload: Option<P>,
    pub(crate) prev: Option<VertexId>,
    pub(crate) next: Option<VertexId>,
    pub(crate) first_arc: Option<ArcId>,
    pub(crate) last_arc: Option<ArcId>,
    pub(crate) out_degree: usize,
}

impl<P> VertexEntry<P> {
    pub(crate) fn new(key: u32, prev: Option<VertexId>) -> Self {
        Self {
            key,
            payload: None,
            prev,
            next: None,
            first_arc: None,
            last_arc: None,
            out_degree: 0,
        }
    }
}

/// A directed arc, linked into its owner's arc list.
#[derive(Debug)]
pub(crate) struct ArcEntry {
    pub(crate) value: u32,
    pub(crate) owner: VertexId,
    pub(crate) dest: VertexId,
    pub(crate) prev: Option<ArcId>,
    pub(crate) next: Option<ArcId>,
}

impl<P> Chain for Slab<VertexEntry<P>> {
    type Handle = VertexId;
    type Node = VertexEntry<P>;

    fn resolve(&self, handle: VertexId) -> Option<&VertexEntry<P>> {
        self.get(handle.0)
    }

    fn next(&self, node: &VertexEntry<P>) -> Option<VertexId> {
        node.next
    }
}

impl Chain for Slab<ArcEntry> {
    type Handle = ArcId;
    type Node = ArcEntry;

    fn resolve(&self, handle: ArcId) -> Option<&ArcEntry> {
        self.get(handle.0)
    }

    fn next(&self, node: &ArcEntry) -> Option<ArcId> {
        node.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slab_reuses_freed_slots() {
        let mut slab = Slab::new();
        let a = slab.insert("a");
        let b = slab.insert("b");
        assert_eq!(slab.len(), 2);

        assert_eq!(slab.remove(a), Some("a"));
        assert_eq!(slab.remove(a), None);
        assert_eq!(slab.len(), 1);

        let c = slab.insert("c");
        assert_eq!(c, a);
        assert_eq!(slab.get(c), Some(&"c"));
        assert_eq!(slab.get(b), Some(&"b"));
        assert_eq!(slab.len(), 2);
    }

    #[test]
    fn test_slab_out_of_range() {
        let mut slab: Slab<u32> = Slab::new();
        assert!(slab.get(3).is_none());
        assert!(slab.get_mut(3).is_none());
        assert!(slab.remove(3).is_none());
    }
}
