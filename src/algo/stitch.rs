//! Seam stitching between adjacent faces.
//!
//! [`auto_stitch`] re-projects one face and moves its UVs so the edge it shares
//! with another face lines up with that face's UVs, then welds the two edge
//! endpoints in the shared-texture table.
//!
//! # Algorithm
//!
//! 1. Build a [`WingedEdges`] graph over both faces and find the shared edge
//! 2. Propagate manual-UV mode from the anchor face, clear texture groups
//! 3. Planar-project the moving face along its own normal
//! 4. [`align_edges`]: uniform scale to match edge length, translate edge
//!    midpoints together, rotate about the midpoint, retry half a turn if the
//!    endpoints still disagree
//! 5. For auto-UV faces, store the resulting transform on the face settings
//!
//! # Example
//!
//! ```
//! use stitchwork::algo::stitch::auto_stitch;
//! use stitchwork::algo::unwrap::refresh_all;
//! use stitchwork::mesh::{build_cube, FaceId, UvChannel};
//!
//! let mut mesh = build_cube(1.0).unwrap();
//! refresh_all(&mut mesh);
//!
//! // +X and +Y share an edge; +X and -X do not.
//! assert!(auto_stitch(&mut mesh, FaceId::new(0), FaceId::new(2), UvChannel::Uv0));
//! assert!(!auto_stitch(&mut mesh, FaceId::new(0), FaceId::new(1), UvChannel::Uv0));
//! ```

use nalgebra::{Point2, Vector2};

use super::unwrap::{project_face, set_auto_and_align_unwrap_params_to_uvs, write_channel};
use crate::mesh::{
    angle_between, cross_z, rotate_around, scale_around, EditableMesh, Edge, FaceId, UvChannel, WingedEdges,
};

/// Options for seam stitching.
#[derive(Debug, Clone)]
pub struct StitchOptions {
    /// Endpoint mismatch (sum of both distances) above which a half-turn
    /// retry is attempted.
    pub error_threshold: f64,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            error_threshold: 0.02,
        }
    }
}

impl StitchOptions {
    /// Set the retry threshold.
    pub fn with_error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }
}

/// Outcome of [`align_edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAlignment {
    /// Uniform scale applied to the moved face.
    pub scale: f64,
    /// Total clockwise rotation applied, in degrees.
    pub rotation: f64,
    /// Remaining endpoint mismatch.
    pub error: f64,
}

/// Stitch face `b` onto face `a` along their shared edge.
///
/// Returns `false`, leaving the mesh untouched, if the faces do not share an
/// edge.
pub fn auto_stitch(mesh: &mut EditableMesh, a: FaceId, b: FaceId, channel: UvChannel) -> bool {
    auto_stitch_with_options(mesh, a, b, channel, &StitchOptions::default())
}

/// [`auto_stitch`] with explicit options.
pub fn auto_stitch_with_options(
    mesh: &mut EditableMesh,
    a: FaceId,
    b: FaceId,
    channel: UvChannel,
    options: &StitchOptions,
) -> bool {
    let graph = WingedEdges::build(mesh, &[a, b]);

    let Some(shared) = graph.shared_edge(a, b) else {
        log::debug!("faces {:?} and {:?} share no edge", a, b);
        return false;
    };
    let Some(opposite) = graph.opposite(shared) else {
        return false;
    };
    let align_to = graph.edge(shared).local;
    let to_be_aligned = graph.edge(opposite).local;

    if mesh.face(a).manual_uv {
        mesh.face_mut(b).manual_uv = true;
    }
    mesh.face_mut(a).texture_group = None;
    mesh.face_mut(b).texture_group = None;

    let projected = project_face(mesh, b);
    let indices = mesh.face(b).distinct_indices().to_vec();
    write_channel(mesh, channel, &indices, projected);

    let alignment = align_edges(mesh, b, align_to, to_be_aligned, channel, options);
    log::debug!(
        "stitched {:?} to {:?}: scale {:.4}, rotation {:.2}, error {:.6}",
        b,
        a,
        alignment.scale,
        alignment.rotation,
        alignment.error
    );

    // Auto faces only ever regenerate channel 0.
    if !mesh.face(b).manual_uv && channel == UvChannel::Uv0 {
        set_auto_and_align_unwrap_params_to_uvs(mesh, &[b]);
    }

    true
}

/// Move the UVs of `face_to_move` so `to_be_aligned` lies on `align_to`.
///
/// `align_to` is an edge of the stationary face and `to_be_aligned` the edge
/// of `face_to_move` at the same position. Endpoints are paired through the
/// shared-vertex table. After alignment the moved face's coordinates are split
/// from any previous texture sharing and each endpoint pair is welded.
pub fn align_edges(
    mesh: &mut EditableMesh,
    face_to_move: FaceId,
    align_to: Edge,
    to_be_aligned: Edge,
    channel: UvChannel,
    options: &StitchOptions,
) -> EdgeAlignment {
    let (x1, y1) = if mesh.shared_vertices().same_class(align_to.a, to_be_aligned.a) {
        (to_be_aligned.a, to_be_aligned.b)
    } else {
        (to_be_aligned.b, to_be_aligned.a)
    };
    let match_x = [align_to.a, x1];
    let match_y = [align_to.b, y1];

    let distinct = mesh.face(face_to_move).distinct_indices().to_vec();
    let (uvs, shared_textures) = mesh.channel_and_textures_mut(channel);

    let scale = nalgebra::distance(&uvs[align_to.a], &uvs[align_to.b])
        / nalgebra::distance(&uvs[to_be_aligned.a], &uvs[to_be_aligned.b]);
    for &i in &distinct {
        uvs[i] = scale_around(uvs[i], Point2::origin(), Vector2::new(scale, scale));
    }

    let target = nalgebra::center(&uvs[align_to.a], &uvs[align_to.b]);
    let delta = target - nalgebra::center(&uvs[to_be_aligned.a], &uvs[to_be_aligned.b]);
    for &i in &distinct {
        uvs[i] += delta;
    }

    let edge_to = uvs[match_y[0]] - uvs[match_x[0]];
    let edge_moved = uvs[match_y[1]] - uvs[match_x[1]];
    let mut rotation = angle_between(&edge_to, &edge_moved);
    if cross_z(&edge_to, &edge_moved) < 0.0 {
        rotation = 360.0 - rotation;
    }
    rotate_all(uvs, &distinct, target, rotation);

    let mut error = endpoint_error(uvs, match_x, match_y);
    if error > options.error_threshold {
        rotate_all(uvs, &distinct, target, 180.0);
        let retry = endpoint_error(uvs, match_x, match_y);
        log::trace!("alignment error {:.6}, half-turn retry {:.6}", error, retry);

        if retry < error {
            error = retry;
            rotation += 180.0;
        } else {
            rotate_all(uvs, &distinct, target, 180.0);
        }
    }

    shared_textures.split(&distinct);
    shared_textures.set_coincident(&match_x);
    shared_textures.set_coincident(&match_y);

    EdgeAlignment {
        scale,
        rotation,
        error,
    }
}

fn rotate_all(uvs: &mut [Point2<f64>], indices: &[usize], origin: Point2<f64>, degrees: f64) {
    for &i in indices {
        uvs[i] = rotate_around(uvs[i], origin, degrees);
    }
}

fn endpoint_error(uvs: &[Point2<f64>], match_x: [usize; 2], match_y: [usize; 2]) -> f64 {
    nalgebra::distance(&uvs[match_x[0]], &uvs[match_x[1]])
        + nalgebra::distance(&uvs[match_y[0]], &uvs[match_y[1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::unwrap::refresh_all;
    use crate::mesh::{build_cube, Face};
    use nalgebra::Point3;

    /// Two triangles sharing the edge (0,0,0)-(1,0,0), each owning its vertices.
    fn hinge() -> EditableMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)];
        EditableMesh::new(positions, faces).unwrap()
    }

    fn seam_pairs(mesh: &EditableMesh, a: FaceId, b: FaceId) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for &i in mesh.face(a).distinct_indices() {
            for &j in mesh.face(b).distinct_indices() {
                if mesh.shared_vertices().same_class(i, j) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    #[test]
    fn test_align_edges_scales_to_match() {
        let mut mesh = hinge();
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, -2.0),
        ];
        mesh.set_uvs(UvChannel::Uv0, uvs).unwrap();

        let result = align_edges(
            &mut mesh,
            FaceId::new(1),
            Edge::new(0, 1),
            Edge::new(3, 4),
            UvChannel::Uv0,
            &StitchOptions::default(),
        );

        assert!((result.scale - 0.5).abs() < 1e-10);
        assert!(result.error < 1e-10);

        let uvs = mesh.textures();
        assert!((uvs[3] - uvs[1]).norm() < 1e-10);
        assert!((uvs[4] - uvs[0]).norm() < 1e-10);
        assert!((uvs[5] - Point2::new(0.0, -1.0)).norm() < 1e-10);

        assert!(mesh.shared_textures().same_class(0, 4));
        assert!(mesh.shared_textures().same_class(1, 3));
        assert!(!mesh.shared_textures().same_class(0, 3));
    }

    #[test]
    fn test_align_edges_reversed_direction() {
        let mut mesh = hinge();
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(3.0, 3.0),
            Point2::new(5.0, 3.0),
            Point2::new(4.0, 5.0),
        ];
        mesh.set_uvs(UvChannel::Uv0, uvs).unwrap();

        let result = align_edges(
            &mut mesh,
            FaceId::new(1),
            Edge::new(0, 1),
            Edge::new(3, 4),
            UvChannel::Uv0,
            &StitchOptions::default(),
        );

        assert!(result.error < 1e-9);
        let uvs = mesh.textures();
        assert!((uvs[3] - uvs[1]).norm() < 1e-9);
        assert!((uvs[4] - uvs[0]).norm() < 1e-9);
    }

    /// Triangles folded along (0,0,0)-(1,0,0): one in the XY plane, one
    /// hanging below it in the XZ plane.
    fn folded_triangles() -> EditableMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.3, 0.8, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.7, 0.0, -0.9),
        ];
        let faces = vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)];
        EditableMesh::new(positions, faces).unwrap()
    }

    #[test]
    fn test_stitch_auto_triangles_keeps_seam() {
        let mut mesh = folded_triangles();
        let (a, b) = (FaceId::new(0), FaceId::new(1));
        mesh.face_mut(a).uv.rotation = 37.0;
        refresh_all(&mut mesh);

        assert!(auto_stitch(&mut mesh, a, b, UvChannel::Uv0));
        assert!(!mesh.face(b).manual_uv);

        let pairs = seam_pairs(&mesh, a, b);
        assert_eq!(pairs.len(), 2);
        let error: f64 = pairs
            .iter()
            .map(|&(i, j)| (mesh.textures()[i] - mesh.textures()[j]).norm())
            .sum();
        assert!(error < 0.02, "seam error {}", error);

        // The stored settings regenerate the stitched layout.
        let stitched = mesh.textures().to_vec();
        refresh_all(&mut mesh);
        for (p, q) in stitched.iter().zip(mesh.textures()) {
            assert!((p - q).norm() < 1e-9);
        }
    }

    #[test]
    fn test_cube_stitch_welds_seam() {
        let mut mesh = build_cube(1.0).unwrap();
        refresh_all(&mut mesh);
        let (a, b) = (FaceId::new(0), FaceId::new(2));
        let before_a: Vec<Point2<f64>> = mesh.face(a).distinct_indices().iter().map(|&i| mesh.textures()[i]).collect();

        assert!(auto_stitch(&mut mesh, a, b, UvChannel::Uv0));

        let pairs = seam_pairs(&mesh, a, b);
        assert_eq!(pairs.len(), 2);
        for (i, j) in pairs {
            assert!((mesh.textures()[i] - mesh.textures()[j]).norm() < 0.02);
            assert!(mesh.shared_textures().same_class(i, j));
        }

        // The anchor face does not move.
        let after_a: Vec<Point2<f64>> = mesh.face(a).distinct_indices().iter().map(|&i| mesh.textures()[i]).collect();
        assert_eq!(before_a, after_a);
        assert!(!mesh.face(b).manual_uv);
    }

    #[test]
    fn test_stitch_non_adjacent() {
        let mut mesh = build_cube(1.0).unwrap();
        refresh_all(&mut mesh);
        let before = mesh.textures().to_vec();

        assert!(!auto_stitch(&mut mesh, FaceId::new(0), FaceId::new(1), UvChannel::Uv0));
        assert_eq!(mesh.textures(), &before[..]);
    }

    #[test]
    fn test_stitch_propagates_manual_and_clears_groups() {
        let mut mesh = build_cube(1.0).unwrap();
        refresh_all(&mut mesh);
        let (a, b) = (FaceId::new(4), FaceId::new(0));
        mesh.face_mut(a).manual_uv = true;
        mesh.face_mut(a).texture_group = Some(3);
        mesh.face_mut(b).texture_group = Some(3);

        assert!(auto_stitch(&mut mesh, a, b, UvChannel::Uv0));
        assert!(mesh.face(b).manual_uv);
        assert_eq!(mesh.face(a).texture_group, None);
        assert_eq!(mesh.face(b).texture_group, None);

        for (i, j) in seam_pairs(&mesh, a, b) {
            assert!((mesh.textures()[i] - mesh.textures()[j]).norm() < 0.02);
        }
    }

    #[test]
    fn test_stitch_secondary_channel() {
        let mut mesh = build_cube(1.0).unwrap();
        refresh_all(&mut mesh);
        let copy = mesh.textures().to_vec();
        mesh.set_uvs(UvChannel::Uv2, copy).unwrap();
        let (a, b) = (FaceId::new(2), FaceId::new(4));

        assert!(auto_stitch(&mut mesh, a, b, UvChannel::Uv2));
        let uv2 = mesh.uvs(UvChannel::Uv2).unwrap();
        for (i, j) in seam_pairs(&mesh, a, b) {
            assert!((uv2[i] - uv2[j]).norm() < 0.02);
        }
    }
}
