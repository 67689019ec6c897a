//! Winged-edge adjacency for a subset of faces.
//!
//! [`WingedEdges`] is built fresh for each operation from the current faces
//! and shared-vertex table, then dropped. It is never cached on the mesh
//! because positions and faces can change between calls.
//!
//! # Structure
//!
//! - Each perimeter edge of each face becomes one half-edge record
//! - Each record knows its **face**, the **next** and **previous** record
//!   around that face, and its **opposite** record on an adjacent face
//! - Opposites are matched through shared-vertex classes, so two faces that
//!   own separate but coincident vertices are still adjacent
//!
//! Records live in a flat arena and refer to each other by [`HalfEdgeId`].
//! Boundary records have an invalid opposite.

use std::collections::HashMap;

use super::editable::EditableMesh;
use super::face::{Edge, EdgeLookup};
use super::index::{FaceId, HalfEdgeId};

/// A directed face edge in a [`WingedEdges`] arena.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The edge in local and common indices.
    pub edge: EdgeLookup,

    /// The face this half-edge belongs to.
    pub face: FaceId,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub previous: HalfEdgeId,

    /// The half-edge on the adjacent face, invalid on the boundary.
    pub opposite: HalfEdgeId,
}

impl HalfEdge {
    /// Check if this half-edge is on the boundary of the face set.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.opposite.is_valid()
    }
}

/// Winged-edge adjacency graph over a set of faces.
#[derive(Debug, Clone, Default)]
pub struct WingedEdges {
    halfedges: Vec<HalfEdge>,
    /// First half-edge of each face, in build order.
    face_starts: Vec<(FaceId, HalfEdgeId)>,
}

impl WingedEdges {
    /// Build the graph for `faces` of `mesh`.
    ///
    /// Each face's perimeter edges become a ring of half-edges. When more than
    /// two faces share a common edge, the edge pairs with the most recent
    /// unpaired occurrence.
    pub fn build(mesh: &EditableMesh, faces: &[FaceId]) -> Self {
        let lookup = mesh.shared_vertices();
        let mut halfedges: Vec<HalfEdge> = Vec::new();
        let mut face_starts = Vec::with_capacity(faces.len());
        let mut unpaired: HashMap<Edge, HalfEdgeId> = HashMap::new();

        for &f in faces {
            let edges = mesh.face(f).edges();
            if edges.is_empty() {
                continue;
            }

            let first = halfedges.len();
            let len = edges.len();
            face_starts.push((f, HalfEdgeId::new(first)));

            for (n, e) in edges.iter().enumerate() {
                let id = HalfEdgeId::new(first + n);
                let common = Edge::new(lookup.lookup(e.a), lookup.lookup(e.b));

                let mut he = HalfEdge {
                    edge: EdgeLookup { common, local: *e },
                    face: f,
                    next: HalfEdgeId::new(first + (n + 1) % len),
                    previous: HalfEdgeId::new(first + (n + len - 1) % len),
                    opposite: HalfEdgeId::invalid(),
                };

                if let Some(opp) = unpaired.remove(&common.normalized()) {
                    he.opposite = opp;
                    halfedges[opp.index()].opposite = id;
                } else {
                    unpaired.insert(common.normalized(), id);
                }

                halfedges.push(he);
            }
        }

        Self {
            halfedges,
            face_starts,
        }
    }

    // ==================== Accessors ====================

    /// Number of half-edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    // ==================== Topology Queries ====================

    /// The face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// The next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// The previous half-edge around the face.
    #[inline]
    pub fn previous(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).previous
    }

    /// The opposite half-edge, or `None` on the boundary.
    #[inline]
    pub fn opposite(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        let opp = self.halfedge(he).opposite;
        opp.is_valid().then_some(opp)
    }

    /// The edge of a half-edge.
    #[inline]
    pub fn edge(&self, he: HalfEdgeId) -> EdgeLookup {
        self.halfedge(he).edge
    }

    /// Iterate over the half-edges around a face. Empty if the face was not
    /// part of the build.
    pub fn face_halfedges(&self, face: FaceId) -> FaceHalfEdgeIter<'_> {
        let start = self
            .face_starts
            .iter()
            .find(|(f, _)| *f == face)
            .map(|&(_, he)| he)
            .unwrap_or_default();
        FaceHalfEdgeIter::new(self, start)
    }

    /// Number of half-edges in the ring starting at `he`.
    pub fn ring_len(&self, he: HalfEdgeId) -> usize {
        FaceHalfEdgeIter::new(self, he).count()
    }

    /// The half-edge of `a` whose opposite lies on `b`.
    pub fn shared_edge(&self, a: FaceId, b: FaceId) -> Option<HalfEdgeId> {
        self.face_halfedges(a)
            .find(|&he| self.opposite(he).is_some_and(|opp| self.face_of(opp) == b))
    }

    /// Faces sharing an edge with `face`, in ring order, without duplicates.
    pub fn adjacent_faces(&self, face: FaceId) -> Vec<FaceId> {
        let mut out = Vec::new();
        for he in self.face_halfedges(face) {
            if let Some(opp) = self.opposite(he) {
                let f = self.face_of(opp);
                if !out.contains(&f) {
                    out.push(f);
                }
            }
        }
        out
    }

    /// Half-edges with no opposite.
    pub fn boundary_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedge_ids()
            .filter(|&he| self.halfedge(he).is_boundary())
    }

    /// Check that next/previous/opposite links are mutually consistent.
    pub fn is_valid(&self) -> bool {
        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::new(i);
            if self.previous(he.next) != id || self.next(he.previous) != id {
                return false;
            }
            if he.opposite.is_valid() && self.halfedge(he.opposite).opposite != id {
                return false;
            }
            if self.face_of(he.next) != he.face {
                return false;
            }
        }
        true
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a> {
    graph: &'a WingedEdges,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(graph: &'a WingedEdges, start: HalfEdgeId) -> Self {
        Self {
            graph,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.graph.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
