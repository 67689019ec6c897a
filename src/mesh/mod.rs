//! Core mesh data structures.
//!
//! This module provides the editable mesh that UV operations work on, together
//! with the equivalence tables and the per-call topology graph.
//!
//! # Overview
//!
//! The primary type is [`EditableMesh`]: positions, [`Face`]s carrying their
//! [`UnwrapSettings`], up to four UV channels and two [`EquivalenceTable`]s.
//!
//! - The **shared-vertex** table groups indices at the same position. Faces
//!   normally own their vertices, so this table is what connects them.
//! - The **shared-texture** table groups indices whose UVs are welded.
//!
//! Adjacency is not stored on the mesh. [`WingedEdges`] builds it for a set of
//! faces when an operation needs it.
//!
//! # Index Types
//!
//! - [`FaceId`] - Identifies a face
//! - [`HalfEdgeId`] - Identifies a record in a [`WingedEdges`] graph
//!
//! Vertex and texture indices are plain `usize` positions into the mesh arrays.
//!
//! # Construction
//!
//! ```
//! use stitchwork::mesh::{build_from_quads, FaceId, WingedEdges};
//! use nalgebra::Point3;
//!
//! // Two unit quads side by side, each owning its vertices.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [4, 5, 6, 7]]).unwrap();
//!
//! let (a, b) = (FaceId::new(0), FaceId::new(1));
//! let graph = WingedEdges::build(&mesh, &[a, b]);
//! assert!(graph.shared_edge(a, b).is_some());
//! ```

mod builder;
mod editable;
mod face;
mod halfedge;
mod index;
mod settings;
mod shared;
mod uv;

pub use builder::{
    build_cube, build_from_quads, build_from_triangles, build_grid, shared_vertices_from_positions,
    VERTEX_WELD_RESOLUTION,
};
pub use editable::EditableMesh;
pub use face::{sort_edges_by_adjacency, Edge, EdgeLookup, Face};
pub use halfedge::{FaceHalfEdgeIter, HalfEdge, WingedEdges};
pub use index::{FaceId, HalfEdgeId};
pub use settings::{Anchor, Fill, UnwrapSettings};
pub use shared::EquivalenceTable;
pub use uv::{angle_between, average, cross_z, rotate_around, scale_around, Bounds2, UvChannel};
