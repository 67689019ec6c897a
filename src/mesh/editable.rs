//! The editable mesh operated on by the UV algorithms.
//!
//! [`EditableMesh`] owns everything a UV operation reads or writes: positions,
//! faces with their unwrap settings, up to four UV channels and the two
//! equivalence tables. Each operation mutates it in place; callers that need
//! undo take a snapshot (the mesh is `Clone`) before calling.
//!
//! # Table invalidation
//!
//! The shared-vertex table is derived from positions and faces, the
//! shared-texture table from UV edits. Every setter here that changes topology
//! rebuilds the affected table. Code that edits faces through [`Self::face_mut`]
//! in a way that changes which indices exist must call
//! [`Self::invalidate_shared_lookups`] itself.

use nalgebra::{Matrix4, Point2, Point3, Vector3};

use super::builder::shared_vertices_from_positions;
use super::face::Face;
use super::index::FaceId;
use super::shared::EquivalenceTable;
use super::uv::UvChannel;
use crate::algo::projection::find_best_plane;
use crate::error::{MeshError, Result};

/// An editable polygon mesh with UV channels.
#[derive(Debug, Clone)]
pub struct EditableMesh {
    pub(crate) positions: Vec<Point3<f64>>,
    pub(crate) faces: Vec<Face>,
    /// Channel 0 is always allocated; the others on first write.
    pub(crate) uvs: [Option<Vec<Point2<f64>>>; 4],
    pub(crate) shared_vertices: EquivalenceTable,
    pub(crate) shared_textures: EquivalenceTable,
    /// Model-to-world transform used by world-space projections.
    pub(crate) transform: Matrix4<f64>,
}

impl EditableMesh {
    /// Create a mesh from positions and faces.
    ///
    /// Faces are validated against `positions`. The shared-vertex table is
    /// built from coincident positions and UV channel 0 is zero-filled.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<Face>) -> Result<Self> {
        validate_faces(&faces, positions.len())?;

        let n = positions.len();
        let shared_vertices = shared_vertices_from_positions(&positions);

        Ok(Self {
            positions,
            faces,
            uvs: [Some(vec![Point2::origin(); n]), None, None, None],
            shared_vertices,
            shared_textures: EquivalenceTable::with_singletons(n),
            transform: Matrix4::identity(),
        })
    }

    // ==================== Accessors ====================

    /// Number of vertices (positions).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Primary texture coordinates (channel 0).
    #[inline]
    pub fn textures(&self) -> &[Point2<f64>] {
        self.uvs[0].as_deref().unwrap_or(&[])
    }

    /// UV coordinates of a channel, if it has been allocated.
    pub fn uvs(&self, channel: UvChannel) -> Option<&[Point2<f64>]> {
        self.uvs[channel.index()].as_deref()
    }

    /// Mutable UV coordinates of a channel, allocating a zero-filled array on
    /// first access. Arrays that drifted out of sync with the positions are
    /// resized.
    pub fn uvs_mut(&mut self, channel: UvChannel) -> &mut Vec<Point2<f64>> {
        let n = self.positions.len();
        let uvs = self.uvs[channel.index()].get_or_insert_with(|| vec![Point2::origin(); n]);
        if uvs.len() != n {
            log::warn!(
                "UV channel {} had {} coordinates for {} vertices; resizing",
                channel.index(),
                uvs.len(),
                n
            );
            uvs.resize(n, Point2::origin());
        }
        uvs
    }

    /// A channel together with the shared-texture table, for edits that move
    /// coordinates and regroup them in one pass.
    pub(crate) fn channel_and_textures_mut(
        &mut self,
        channel: UvChannel,
    ) -> (&mut [Point2<f64>], &mut EquivalenceTable) {
        self.uvs_mut(channel);
        let uvs = self.uvs[channel.index()].get_or_insert_with(Vec::new);
        (uvs, &mut self.shared_textures)
    }

    /// Replace the UV coordinates of a channel.
    pub fn set_uvs(&mut self, channel: UvChannel, uvs: Vec<Point2<f64>>) -> Result<()> {
        if uvs.len() != self.positions.len() {
            return Err(MeshError::UvLengthMismatch {
                channel: channel.index(),
                len: uvs.len(),
                expected: self.positions.len(),
            });
        }
        self.uvs[channel.index()] = Some(uvs);
        Ok(())
    }

    /// Shared-vertex equivalence table (coincident positions).
    #[inline]
    pub fn shared_vertices(&self) -> &EquivalenceTable {
        &self.shared_vertices
    }

    /// Shared-texture equivalence table (welded UVs).
    #[inline]
    pub fn shared_textures(&self) -> &EquivalenceTable {
        &self.shared_textures
    }

    /// Mutable shared-texture table.
    #[inline]
    pub fn shared_textures_mut(&mut self) -> &mut EquivalenceTable {
        &mut self.shared_textures
    }

    /// Shared-vertex class of `index`.
    #[inline]
    pub fn shared_vertex_handle(&self, index: usize) -> usize {
        self.shared_vertices.lookup(index)
    }

    /// Weld the texture coordinates of `indices` into one class.
    pub fn set_textures_coincident(&mut self, indices: &[usize]) {
        self.shared_textures.set_coincident(indices);
    }

    /// Model-to-world transform.
    #[inline]
    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    /// Set the model-to-world transform.
    pub fn set_transform(&mut self, transform: Matrix4<f64>) {
        self.transform = transform;
    }

    // ==================== Topology changes ====================

    /// Replace the positions. The vertex count must not change.
    ///
    /// Rebuilds the shared-vertex table since coincidence may have changed.
    pub fn set_positions(&mut self, positions: Vec<Point3<f64>>) -> Result<()> {
        if positions.len() != self.positions.len() {
            return Err(MeshError::invalid_param(
                "positions",
                positions.len(),
                "vertex count must not change",
            ));
        }
        self.positions = positions;
        self.shared_vertices = shared_vertices_from_positions(&self.positions);
        Ok(())
    }

    /// Replace the faces, rebuilding both equivalence tables.
    pub fn set_faces(&mut self, faces: Vec<Face>) -> Result<()> {
        validate_faces(&faces, self.positions.len())?;
        self.faces = faces;
        self.invalidate_shared_lookups();
        Ok(())
    }

    /// Replace the shared-vertex table with explicit groups.
    pub fn set_shared_vertices(&mut self, groups: &[Vec<usize>]) -> Result<()> {
        let n = self.positions.len();
        for (g, group) in groups.iter().enumerate() {
            if let Some(&bad) = group.iter().find(|&&i| i >= n) {
                return Err(MeshError::InvalidSharedIndex { group: g, vertex: bad });
            }
        }
        self.shared_vertices = EquivalenceTable::from_groups(n, groups);
        Ok(())
    }

    /// Rebuild the shared-vertex table from positions and reset every texture
    /// coordinate to its own class.
    ///
    /// Call this after any topology change made outside this crate.
    pub fn invalidate_shared_lookups(&mut self) {
        log::debug!("rebuilding shared lookups for {} vertices", self.positions.len());
        self.shared_vertices = shared_vertices_from_positions(&self.positions);
        self.shared_textures = EquivalenceTable::with_singletons(self.positions.len());
    }

    // ==================== Geometry ====================

    /// Unit normal of a face.
    ///
    /// Uses the first triangle. Faces with more than two triangles use the
    /// best-fit plane normal, oriented to agree with the first triangle.
    pub fn face_normal(&self, id: FaceId) -> Vector3<f64> {
        let face = self.face(id);
        let idx = face.indices();
        let p0 = self.positions[idx[0]];
        let p1 = self.positions[idx[1]];
        let p2 = self.positions[idx[2]];
        let nrm = (p1 - p0).cross(&(p2 - p0)).normalize();

        if idx.len() > 6 {
            let (plane, _) = find_best_plane(&self.positions, face.distinct_indices());
            if nrm.dot(&plane) < 0.0 {
                return -plane;
            }
            return plane;
        }

        nrm
    }

    // ==================== Texture groups ====================

    /// Smallest texture group id `>= start` that no face uses.
    pub fn unused_texture_group(&self, start: u32) -> u32 {
        let mut group = start;
        while self.faces.iter().any(|f| f.texture_group == Some(group)) {
            group += 1;
        }
        group
    }

    /// Faces belonging to a texture group, in mesh order.
    pub fn faces_in_texture_group(&self, group: u32) -> Vec<FaceId> {
        self.face_ids()
            .filter(|&f| self.face(f).texture_group == Some(group))
            .collect()
    }

    /// Distinct indices of several faces, concatenated in face order.
    pub fn distinct_indices_of(&self, faces: &[FaceId]) -> Vec<usize> {
        faces
            .iter()
            .flat_map(|&f| self.face(f).distinct_indices().iter().copied())
            .collect()
    }
}

fn validate_faces(faces: &[Face], num_positions: usize) -> Result<()> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        let idx = face.indices();
        if idx.is_empty() || idx.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangles {
                face: fi,
                len: idx.len(),
            });
        }
        if let Some(&vi) = idx.iter().find(|&&vi| vi >= num_positions) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        for t in idx.chunks_exact(3) {
            if t[0] == t[1] || t[1] == t[2] || t[0] == t[2] {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    Ok(())
}
