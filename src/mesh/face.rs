//! Polygon faces made of triangles.
//!
//! A [`Face`] is an ordered triangle list into the mesh position array. Faces
//! usually own their vertices (an index appears in one face only) and rely on
//! the shared-vertex table to know which indices sit at the same position.

use std::collections::HashMap;

use super::settings::UnwrapSettings;

/// An edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// First index.
    pub a: usize,
    /// Second index.
    pub b: usize,
}

impl Edge {
    /// Create a new edge.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// The same edge with the lower index first, for direction-independent lookups.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self::new(self.b, self.a)
        }
    }

    /// True if either endpoint equals `index`.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }
}

/// A face edge seen both locally (vertex indices) and commonly (shared-vertex
/// class ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeLookup {
    /// Edge in shared-vertex class ids.
    pub common: Edge,
    /// Edge in vertex indices.
    pub local: Edge,
}

/// A polygon face.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Triangle list; length is a multiple of 3.
    indices: Vec<usize>,

    /// Unique indices in order of first appearance.
    distinct: Vec<usize>,

    /// Perimeter edges sorted by adjacency.
    edges: Vec<Edge>,

    /// Auto unwrap settings.
    pub uv: UnwrapSettings,

    /// Manual faces keep their UVs; auto faces are regenerated from `uv`.
    pub manual_uv: bool,

    /// Faces with the same texture group are projected as one unit.
    pub texture_group: Option<u32>,

    /// Grouping tag for element selection.
    pub element_group: Option<u32>,
}

impl Face {
    /// Create a face from a triangle list.
    ///
    /// The list is not validated here; [`super::EditableMesh`] checks faces
    /// against its positions on construction.
    pub fn new(indices: Vec<usize>) -> Self {
        let mut face = Self {
            indices: Vec::new(),
            distinct: Vec::new(),
            edges: Vec::new(),
            uv: UnwrapSettings::default(),
            manual_uv: false,
            texture_group: None,
            element_group: None,
        };
        face.set_indices(indices);
        face
    }

    /// Create a single-triangle face.
    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self::new(vec![a, b, c])
    }

    /// Create a quad face from four counter-clockwise indices.
    pub fn quad([a, b, c, d]: [usize; 4]) -> Self {
        Self::new(vec![a, b, c, a, c, d])
    }

    /// Triangle list.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Unique indices in order of first appearance.
    #[inline]
    pub fn distinct_indices(&self) -> &[usize] {
        &self.distinct
    }

    /// Perimeter edges in winding order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replace the triangle list and recompute the cached data.
    pub fn set_indices(&mut self, indices: Vec<usize>) {
        self.distinct = distinct(&indices);
        self.edges = perimeter_edges(&indices);
        sort_edges_by_adjacency(&mut self.edges);
        self.indices = indices;
    }

    /// True if `index` is one of this face's vertices.
    pub fn contains(&self, index: usize) -> bool {
        self.distinct.contains(&index)
    }
}

fn distinct(indices: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(indices.len());
    for &i in indices {
        if !out.contains(&i) {
            out.push(i);
        }
    }
    out
}

/// Edges used by exactly one triangle, keeping their winding direction.
fn perimeter_edges(indices: &[usize]) -> Vec<Edge> {
    let all: Vec<Edge> = indices
        .chunks_exact(3)
        .flat_map(|t| {
            [
                Edge::new(t[0], t[1]),
                Edge::new(t[1], t[2]),
                Edge::new(t[2], t[0]),
            ]
        })
        .collect();

    let mut uses: HashMap<Edge, usize> = HashMap::new();
    for e in &all {
        *uses.entry(e.normalized()).or_insert(0) += 1;
    }

    all.into_iter()
        .filter(|e| uses[&e.normalized()] == 1)
        .collect()
}

/// Order edges so that each edge starts where the previous one ends.
///
/// Edges that cannot be chained stay after the chained run in their
/// original order.
pub fn sort_edges_by_adjacency(edges: &mut [Edge]) {
    for i in 1..edges.len() {
        let want = edges[i - 1].b;
        if let Some(found) = (i..edges.len()).find(|&n| edges[n].a == want) {
            edges.swap(i, found);
        } else if let Some(found) = (i..edges.len()).find(|&n| edges[n].contains(want)) {
            edges.swap(i, found);
        }
    }
}
