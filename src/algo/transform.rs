//! Recovery of a 2D similarity transform between two point sets.
//!
//! [`calculate_delta`] compares a raw projection with a target layout and
//! returns the rotation, non-uniform scale and translation that map one onto
//! the other. Storing that transform on a face's [`UnwrapSettings`] lets the
//! layout be regenerated later from a fresh projection.
//!
//! Translation is measured between bounding-box centers, not centroids, so
//! skewed point distributions can drift slightly. Degenerate reference edges
//! give NaN rotation and zero-size bounds give infinite scale; neither is
//! guarded.

use nalgebra::{Point2, Vector2};

use super::unwrap::project_face;
use crate::mesh::{angle_between, rotate_around, Bounds2, EditableMesh, FaceId, UnwrapSettings};

/// Rotation, scale and translation between two point sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// Destination bounds center minus source bounds center.
    pub translation: Vector2<f64>,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
    /// Per-axis scale.
    pub scale: Vector2<f64>,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            translation: Vector2::zeros(),
            rotation: 0.0,
            scale: Vector2::new(1.0, 1.0),
        }
    }
}

impl UvTransform {
    /// Store this transform on unwrap settings.
    ///
    /// The settings offset is subtracted during unwrap, so it receives the
    /// negated translation.
    pub fn apply_to(&self, settings: &mut UnwrapSettings) {
        settings.offset = -self.translation;
        settings.rotation = self.rotation;
        settings.scale = self.scale;
    }

    /// True if any component is NaN or infinite.
    pub fn is_degenerate(&self) -> bool {
        !(self.translation.iter().all(|c| c.is_finite())
            && self.rotation.is_finite()
            && self.scale.iter().all(|c| c.is_finite()))
    }
}

/// Estimate the transform mapping `src[src_indices]` onto `dst[dst_indices]`.
///
/// Both index lists address corresponding points; their first two entries
/// define the reference edge used to measure rotation.
///
/// # Example
///
/// ```
/// use stitchwork::algo::transform::calculate_delta;
/// use nalgebra::Point2;
///
/// let src = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)];
/// let dst = vec![Point2::new(5.0, 5.0), Point2::new(7.0, 5.0), Point2::new(7.0, 7.0)];
/// let t = calculate_delta(&src, &[0, 1, 2], &dst, &[0, 1, 2]);
///
/// assert!(t.rotation.abs() < 1e-10);
/// assert!((t.scale.x - 2.0).abs() < 1e-10);
/// assert!((t.translation.x - 5.5).abs() < 1e-10);
/// ```
pub fn calculate_delta(
    src: &[Point2<f64>],
    src_indices: &[usize],
    dst: &[Point2<f64>],
    dst_indices: &[usize],
) -> UvTransform {
    let dst_edge = dst[dst_indices[1]] - dst[dst_indices[0]];
    let src_edge = src[src_indices[1]] - src[src_indices[0]];

    let mut rotation = angle_between(&dst_edge, &src_edge);
    let perpendicular = Vector2::new(-dst_edge.y, dst_edge.x);
    if perpendicular.dot(&src_edge) < 0.0 {
        rotation = 360.0 - rotation;
    }

    let dst_center = Bounds2::from_indexed(dst, dst_indices).center();
    let dst_size = rotated_size(dst, dst_indices, dst_center, -rotation);
    let src_bounds = Bounds2::from_indexed(src, src_indices);

    UvTransform {
        translation: dst_center - src_bounds.center(),
        rotation,
        scale: dst_size.component_div(&src_bounds.size()),
    }
}

/// Bounds size of the points after rotating them about `center`.
fn rotated_size(points: &[Point2<f64>], indices: &[usize], center: Point2<f64>, degrees: f64) -> Vector2<f64> {
    let rotated: Vec<Point2<f64>> = indices
        .iter()
        .map(|&i| rotate_around(points[i], center, degrees))
        .collect();
    Bounds2::from_points(&rotated).size()
}

/// Transform from a face's unmodified planar projection to its current UVs
/// in channel 0.
///
/// Applying the result to default settings and unwrapping reproduces the
/// current layout up to distortion a similarity cannot express.
pub fn get_uv_transform(mesh: &EditableMesh, face: FaceId) -> UvTransform {
    let f = mesh.face(face);
    let mut projected = vec![Point2::origin(); mesh.num_vertices()];
    for (&i, uv) in f.distinct_indices().iter().zip(project_face(mesh, face)) {
        projected[i] = uv;
    }
    calculate_delta(&projected, f.indices(), mesh.textures(), f.indices())
}
