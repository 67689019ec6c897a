//! Mesh construction utilities.
//!
//! This module builds [`EditableMesh`] values from face-vertex lists and
//! provides a few primitives. It also derives the shared-vertex table from
//! coincident positions, which [`EditableMesh`] uses whenever it rebuilds
//! its lookups.

use std::collections::HashMap;

use nalgebra::Point3;

use super::editable::EditableMesh;
use super::face::Face;
use super::shared::EquivalenceTable;
use crate::error::Result;

/// Positions closer than this on every axis are considered coincident.
pub const VERTEX_WELD_RESOLUTION: f64 = 1e-4;

/// Build a mesh where every triangle is its own face.
///
/// # Example
/// ```
/// use stitchwork::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<EditableMesh> {
    let faces = faces.iter().map(|&[a, b, c]| Face::triangle(a, b, c)).collect();
    EditableMesh::new(vertices.to_vec(), faces)
}

/// Build a mesh where every quad (counter-clockwise) is one two-triangle face.
pub fn build_from_quads(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Result<EditableMesh> {
    let faces = faces.iter().map(|&q| Face::quad(q)).collect();
    EditableMesh::new(vertices.to_vec(), faces)
}

/// Build an axis-aligned cube centered on the origin.
///
/// Each of the six quad faces owns its four vertices; corners are connected
/// through the shared-vertex table only. Faces are ordered +X, -X, +Y, -Y,
/// +Z, -Z.
pub fn build_cube(size: f64) -> Result<EditableMesh> {
    let h = size * 0.5;
    let quads: [[[f64; 3]; 4]; 6] = [
        [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
        [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]],
        [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]],
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(6);
    for quad in &quads {
        let base = vertices.len();
        vertices.extend(quad.iter().map(|&[x, y, z]| Point3::new(x, y, z)));
        faces.push([base, base + 1, base + 2, base + 3]);
    }

    build_from_quads(&vertices, &faces)
}

/// Build a flat grid of `n x n` unit quads in the XY plane, each face owning
/// its vertices.
pub fn build_grid(n: usize) -> Result<EditableMesh> {
    let mut vertices = Vec::with_capacity(n * n * 4);
    let mut faces = Vec::with_capacity(n * n);

    for j in 0..n {
        for i in 0..n {
            let (x, y) = (i as f64, j as f64);
            let base = vertices.len();
            vertices.push(Point3::new(x, y, 0.0));
            vertices.push(Point3::new(x + 1.0, y, 0.0));
            vertices.push(Point3::new(x + 1.0, y + 1.0, 0.0));
            vertices.push(Point3::new(x, y + 1.0, 0.0));
            faces.push([base, base + 1, base + 2, base + 3]);
        }
    }

    build_from_quads(&vertices, &faces)
}

/// Group indices whose positions coincide (to [`VERTEX_WELD_RESOLUTION`]).
pub fn shared_vertices_from_positions(positions: &[Point3<f64>]) -> EquivalenceTable {
    let mut buckets: HashMap<[i64; 3], usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (i, p) in positions.iter().enumerate() {
        let key = [quantize(p.x), quantize(p.y), quantize(p.z)];
        let slot = *buckets.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    EquivalenceTable::from_groups(positions.len(), &groups)
}

#[inline]
fn quantize(v: f64) -> i64 {
    (v / VERTEX_WELD_RESOLUTION).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;
    use nalgebra::Vector3;

    #[test]
    fn test_cube() {
        let mesh = build_cube(2.0).unwrap();
        assert_eq!(mesh.num_vertices(), 24);
        assert_eq!(mesh.num_faces(), 6);
        // 8 corners, each shared by three faces.
        assert_eq!(mesh.shared_vertices().class_count(), 8);

        let expected = [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ];
        for (f, n) in mesh.face_ids().zip(expected.iter()) {
            assert!((mesh.face_normal(f) - n).norm() < 1e-12, "face {:?}", f);
        }
    }

    #[test]
    fn test_grid() {
        let mesh = build_grid(3).unwrap();
        assert_eq!(mesh.num_faces(), 9);
        assert_eq!(mesh.num_vertices(), 36);
        assert_eq!(mesh.shared_vertices().class_count(), 16);
        assert_eq!(mesh.face(FaceId::new(4)).distinct_indices(), &[16, 17, 18, 19]);
    }

    #[test]
    fn test_shared_from_positions_tolerance() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.00001, 0.0, 0.0),
            Point3::new(0.1, 0.0, 0.0),
        ];
        let table = shared_vertices_from_positions(&positions);
        assert!(table.same_class(0, 1));
        assert!(!table.same_class(0, 2));
    }

    #[test]
    fn test_build_errors() {
        let vertices = vec![Point3::origin(); 3];
        assert!(build_from_triangles(&vertices, &[]).is_err());
        assert!(build_from_triangles(&vertices, &[[0, 1, 3]]).is_err());
    }
}
