//! In-memory directed graph engine.
//!
//! A [`Graph`] holds vertices in insertion order, each owning an ordered list of
//! outgoing arcs. Vertices are addressed by a unique `u32` key; arcs carry a
//! `u32` value that the engine stores but never interprets. Each vertex may
//! also hold a payload of type `P` on behalf of the layer above.
//!
//! # Storage
//!
//! Vertex and arc records live in two arena tables and link to each other by
//! handle rather than by pointer. Vertex order and each arc list are doubly
//! linked, so unlinking a located record is O(1) and needs no predecessor
//! search. Lookups by key are linear scans driven by a single search routine
//! shared between vertex lists and arc lists.
//!
//! # Invariants
//!
//! - Vertex keys are unique within a graph.
//! - The tail handle is empty iff the graph has no vertices; the same holds
//!   for each vertex's last-arc handle and its arc list.
//! - An arc's destination is always a present vertex. [`Graph::remove_vertex`]
//!   removes every arc that targets the removed vertex.
//! - No arc starts and ends at the same vertex.
//!
//! A violation found during traversal is reported as
//! [`GraphError::Corrupted`]; the graph should be discarded after that.

mod arena;
mod search;

use crate::error::GraphError;
use arena::{ArcEntry, ArcId, Slab, VertexEntry, VertexId};
use search::{linear_search, walk};
use std::collections::HashSet;
use std::fmt;

/// A named directed graph with ordered vertices and ordered outgoing arcs.
#[derive(Debug)]
pub struct Graph<P = ()> {
    name: String,
    vertices: Slab<VertexEntry<P>>,
    arcs: Slab<ArcEntry>,
    head: Option<VertexId>,
    tail: Option<VertexId>,
}

/// A borrowed view of a single vertex.
pub struct VertexRef<'g, P> {
    graph: &'g Graph<P>,
    id: VertexId,
    entry: &'g VertexEntry<P>,
}

impl<P> fmt::Debug for VertexRef<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexRef")
            .field("key", &self.entry.key)
            .field("out_degree", &self.entry.out_degree)
            .finish()
    }
}

impl<'g, P> VertexRef<'g, P> {
    /// Returns the vertex key.
    pub fn key(&self) -> u32 {
        self.entry.key
    }

    /// Returns the payload attached to this vertex, if any.
    pub fn payload(&self) -> Option<&'g P> {
        self.entry.payload.as_ref()
    }

    /// Returns the number of outgoing arcs.
    pub fn out_degree(&self) -> usize {
        self.entry.out_degree
    }

    /// Returns `(destination, value)` for each outgoing arc, in insertion order.
    pub fn arcs(&self) -> Result<Vec<(u32, u32)>, GraphError> {
        self.graph.arcs_of(self.id)
    }
}

impl<P> Graph<P> {
    /// Creates an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Slab::new(),
            arcs: Slab::new(),
            head: None,
            tail: None,
        }
    }

    /// Returns the graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 0
    }

    /// Returns the total number of arcs.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Looks up a vertex by key.
    ///
    /// Returns `Ok(None)` if no vertex has this key, including when the graph is
    /// empty.
    pub fn find_vertex(&self, key: u32) -> Result<Option<VertexRef<'_, P>>, GraphError> {
        match self.locate(key)? {
            Some(id) => Ok(Some(VertexRef {
                graph: self,
                id,
                entry: self.entry(id)?,
            })),
            None => Ok(None),
        }
    }

    /// Returns true if a vertex with this key exists.
    pub fn contains_vertex(&self, key: u32) -> Result<bool, GraphError> {
        Ok(self.locate(key)?.is_some())
    }

    /// Appends a vertex with the given key.
    pub fn add_vertex(&mut self, key: u32) -> Result<(), GraphError> {
        if self.locate(key)?.is_some() {
            return Err(GraphError::DuplicateKey(key));
        }

        let id = VertexId(self.vertices.insert(VertexEntry::new(key, self.tail)));
        match self.tail {
            Some(tail) => self.entry_mut(tail)?.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        Ok(())
    }

    /// Removes a vertex, every arc it owns, and every arc that targets it.
    ///
    /// Returns the payload that was attached to the vertex.
    pub fn remove_vertex(&mut self, key: u32) -> Result<Option<P>, GraphError> {
        let id = self.require(key)?;

        let mut others = Vec::with_capacity(self.len());
        walk(&self.vertices, self.head, |other, _| {
            if other != id {
                others.push(other);
            }
        })?;
        for other in others {
            // Parallel arcs are representable, so unlink until none remain.
            while let Some(arc) = self.locate_arc(other, id)? {
                self.unlink_arc(arc)?;
            }
        }

        let mut cursor = self.entry(id)?.first_arc;
        while let Some(arc) = cursor {
            let entry = self
                .arcs
                .remove(arc.0)
                .ok_or_else(|| vacant_arc(arc))?;
            cursor = entry.next;
        }

        let entry = self
            .vertices
            .remove(id.0)
            .ok_or_else(|| vacant_vertex(id))?;
        match entry.prev {
            Some(prev) => self.entry_mut(prev)?.next = entry.next,
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => self.entry_mut(next)?.prev = entry.prev,
            None => self.tail = entry.prev,
        }
        Ok(entry.payload)
    }

    /// Appends an arc `from -> to` with value 0.
    pub fn add_arc(&mut self, from: u32, to: u32) -> Result<(), GraphError> {
        let owner = self.require(from)?;
        let dest = self.require(to)?;
        if from == to {
            return Err(GraphError::SameVertex(from));
        }

        let last = self.entry(owner)?.last_arc;
        let id = ArcId(self.arcs.insert(ArcEntry {
            value: 0,
            owner,
            dest,
            prev: last,
            next: None,
        }));
        match last {
            Some(last) => self.arc_entry_mut(last)?.next = Some(id),
            None => self.entry_mut(owner)?.first_arc = Some(id),
        }
        let entry = self.entry_mut(owner)?;
        entry.last_arc = Some(id);
        entry.out_degree += 1;
        Ok(())
    }

    /// Removes the first arc `from -> to` and returns its value.
    pub fn remove_arc(&mut self, from: u32, to: u32) -> Result<u32, GraphError> {
        let owner = self.require(from)?;
        let arc = match self.locate(to)? {
            Some(dest) => self.locate_arc(owner, dest)?,
            None => None,
        };
        let arc = arc.ok_or(GraphError::ArcNotFound { from, to })?;
        Ok(self.unlink_arc(arc)?.value)
    }

    /// Returns true if an arc `from -> to` exists.
    ///
    /// A missing endpoint is not an error here; there is simply no arc.
    pub fn has_arc(&self, from: u32, to: u32) -> Result<bool, GraphError> {
        let (Some(owner), Some(dest)) = (self.locate(from)?, self.locate(to)?) else {
            return Ok(false);
        };
        Ok(self.locate_arc(owner, dest)?.is_some())
    }

    /// Returns the destinations of `key`'s outgoing arcs in insertion order,
    /// without duplicates.
    pub fn neighbors(&self, key: u32) -> Result<Vec<u32>, GraphError> {
        let mut seen = HashSet::new();
        Ok(self
            .arcs(key)?
            .into_iter()
            .map(|(dest, _)| dest)
            .filter(|dest| seen.insert(*dest))
            .collect())
    }

    /// Returns the keys of all vertices with an arc to `key`, in vertex order.
    pub fn predecessors(&self, key: u32) -> Result<Vec<u32>, GraphError> {
        let id = self.require(key)?;
        let mut candidates = Vec::new();
        walk(&self.vertices, self.head, |other, entry| {
            candidates.push((other, entry.key));
        })?;

        let mut keys = Vec::new();
        for (other, other_key) in candidates {
            if self.locate_arc(other, id)?.is_some() {
                keys.push(other_key);
            }
        }
        Ok(keys)
    }

    /// Returns `(destination, value)` for each outgoing arc of `key`, in
    /// insertion order.
    pub fn arcs(&self, key: u32) -> Result<Vec<(u32, u32)>, GraphError> {
        self.arcs_of(self.require(key)?)
    }

    /// Returns all vertex keys in insertion order.
    pub fn keys(&self) -> Result<Vec<u32>, GraphError> {
        self.check_ends()?;
        let mut keys = Vec::with_capacity(self.len());
        walk(&self.vertices, self.head, |_, entry| keys.push(entry.key))?;
        Ok(keys)
    }

    /// Returns the value of the arc `from -> to`.
    pub fn arc_value(&self, from: u32, to: u32) -> Result<u32, GraphError> {
        let arc = self.require_arc(from, to)?;
        Ok(self.arc_entry(arc)?.value)
    }

    /// Sets the value of the arc `from -> to`.
    pub fn set_arc_value(&mut self, from: u32, to: u32, value: u32) -> Result<(), GraphError> {
        let arc = self.require_arc(from, to)?;
        self.arc_entry_mut(arc)?.value = value;
        Ok(())
    }

    /// Returns the payload of vertex `key`.
    pub fn vertex_payload(&self, key: u32) -> Result<Option<&P>, GraphError> {
        let id = self.require(key)?;
        Ok(self.entry(id)?.payload.as_ref())
    }

    /// Returns the payload of vertex `key` mutably.
    pub fn vertex_payload_mut(&mut self, key: u32) -> Result<Option<&mut P>, GraphError> {
        let id = self.require(key)?;
        Ok(self.entry_mut(id)?.payload.as_mut())
    }

    /// Attaches a payload to vertex `key`, returning the previous one.
    pub fn set_vertex_payload(&mut self, key: u32, payload: P) -> Result<Option<P>, GraphError> {
        let id = self.require(key)?;
        Ok(self.entry_mut(id)?.payload.replace(payload))
    }

    /// Detaches and returns the payload of vertex `key`.
    pub fn take_vertex_payload(&mut self, key: u32) -> Result<Option<P>, GraphError> {
        let id = self.require(key)?;
        Ok(self.entry_mut(id)?.payload.take())
    }

    /// Removes every vertex, head first, releasing all arcs and payloads.
    ///
    /// Calling this on an empty graph does nothing.
    pub fn destroy(&mut self) -> Result<(), GraphError> {
        while let Some(head) = self.head {
            let key = self.entry(head)?.key;
            self.remove_vertex(key)?;
        }
        self.check_ends()?;
        self.vertices.clear();
        self.arcs.clear();
        Ok(())
    }

    /// Walks the whole structure and verifies every link.
    ///
    /// Checks head/tail consistency, back links, key uniqueness, arc ownership,
    /// arc destinations and per-vertex arc counts.
    pub fn check_integrity(&self) -> Result<(), GraphError> {
        self.check_ends()?;

        let mut order = Vec::with_capacity(self.len());
        walk(&self.vertices, self.head, |id, _| order.push(id))?;
        if order.len() != self.vertices.len() {
            return Err(GraphError::Corrupted(format!(
                "vertex list reaches {} of {} vertices",
                order.len(),
                self.vertices.len()
            )));
        }
        if order.last().copied() != self.tail {
            return Err(GraphError::Corrupted(
                "tail does not match last vertex in list".to_string(),
            ));
        }

        let mut keys = HashSet::with_capacity(order.len());
        let mut prev = None;
        let mut arc_total = 0;
        for &id in &order {
            let entry = self.entry(id)?;
            if !keys.insert(entry.key) {
                return Err(GraphError::Corrupted(format!(
                    "vertex key {} appears twice",
                    entry.key
                )));
            }
            if entry.prev != prev {
                return Err(GraphError::Corrupted(format!(
                    "vertex {} has a stale back link",
                    entry.key
                )));
            }
            prev = Some(id);

            let mut arcs = Vec::with_capacity(entry.out_degree);
            walk(&self.arcs, entry.first_arc, |arc, node| arcs.push((arc, node.owner, node.dest)))?;
            if arcs.len() != entry.out_degree || arcs.last().map(|a| a.0) != entry.last_arc {
                return Err(GraphError::Corrupted(format!(
                    "arc list of vertex {} is inconsistent",
                    entry.key
                )));
            }
            for (arc, owner, dest) in arcs {
                if owner != id {
                    return Err(GraphError::Corrupted(format!(
                        "arc {arc:?} is linked under vertex {} but owned elsewhere",
                        entry.key
                    )));
                }
                if dest == id {
                    return Err(GraphError::SameVertex(entry.key));
                }
                self.entry(dest)?;
            }
            arc_total += entry.out_degree;
        }

        if arc_total != self.arcs.len() {
            return Err(GraphError::Corrupted(format!(
                "{} arcs are linked but {} are stored",
                arc_total,
                self.arcs.len()
            )));
        }
        Ok(())
    }

    fn check_ends(&self) -> Result<(), GraphError> {
        match (self.head, self.tail, self.vertices.len()) {
            (None, None, 0) => Ok(()),
            (Some(_), Some(_), n) if n > 0 => Ok(()),
            (head, tail, n) => Err(GraphError::Corrupted(format!(
                "head {head:?} and tail {tail:?} are inconsistent with {n} vertices"
            ))),
        }
    }

    fn locate(&self, key: u32) -> Result<Option<VertexId>, GraphError> {
        self.check_ends()?;
        linear_search(&self.vertices, self.head, |entry| entry.key == key)
    }

    fn require(&self, key: u32) -> Result<VertexId, GraphError> {
        self.locate(key)?.ok_or(GraphError::VertexNotFound(key))
    }

    fn locate_arc(&self, owner: VertexId, dest: VertexId) -> Result<Option<ArcId>, GraphError> {
        let start = self.entry(owner)?.first_arc;
        linear_search(&self.arcs, start, |arc| arc.dest == dest)
    }

    fn require_arc(&self, from: u32, to: u32) -> Result<ArcId, GraphError> {
        let owner = self.require(from)?;
        let dest = self.require(to)?;
        self.locate_arc(owner, dest)?
            .ok_or(GraphError::ArcNotFound { from, to })
    }

    fn arcs_of(&self, id: VertexId) -> Result<Vec<(u32, u32)>, GraphError> {
        let mut raw = Vec::new();
        walk(&self.arcs, self.entry(id)?.first_arc, |_, arc| {
            raw.push((arc.dest, arc.value));
        })?;
        let mut pairs = Vec::with_capacity(raw.len());
        for (dest, value) in raw {
            pairs.push((self.entry(dest)?.key, value));
        }
        Ok(pairs)
    }

    fn unlink_arc(&mut self, id: ArcId) -> Result<ArcEntry, GraphError> {
        let arc = self.arcs.remove(id.0).ok_or_else(|| vacant_arc(id))?;
        match arc.prev {
            Some(prev) => self.arc_entry_mut(prev)?.next = arc.next,
            None => self.entry_mut(arc.owner)?.first_arc = arc.next,
        }
        match arc.next {
            Some(next) => self.arc_entry_mut(next)?.prev = arc.prev,
            None => self.entry_mut(arc.owner)?.last_arc = arc.prev,
        }
        self.entry_mut(arc.owner)?.out_degree -= 1;
        Ok(arc)
    }

    fn entry(&self, id: VertexId) -> Result<&VertexEntry<P>, GraphError> {
        self.vertices.get(id.0).ok_or_else(|| vacant_vertex(id))
    }

    fn entry_mut(&mut self, id: VertexId) -> Result<&mut VertexEntry<P>, GraphError> {
        self.vertices.get_mut(id.0).ok_or_else(|| vacant_vertex(id))
    }

    fn arc_entry(&self, id: ArcId) -> Result<&ArcEntry, GraphError> {
        self.arcs.get(id.0).ok_or_else(|| vacant_arc(id))
    }

    fn arc_entry_mut(&mut self, id: ArcId) -> Result<&mut ArcEntry, GraphError> {
        self.arcs.get_mut(id.0).ok_or_else(|| vacant_arc(id))
    }
}

fn vacant_vertex(id: VertexId) -> GraphError {
    GraphError::Corrupted(format!("vertex handle {id:?} is vacant"))
}

fn vacant_arc(id: ArcId) -> GraphError {
    GraphError::Corrupted(format!("arc handle {id:?} is vacant"))
}
