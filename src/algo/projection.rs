//! Projection of 3D points to 2D texture coordinates.
//!
//! All functions here are pure: they read positions and return (or write)
//! coordinates without touching any mesh state, so they can be called
//! repeatedly for previews.
//!
//! # Algorithms
//!
//! - [`planar_project`]: orthographic projection onto the plane facing a direction
//! - [`box_project`]: group faces by dominant axis, planar-project each group
//! - [`spherical_project`]: longitude/latitude mapping about the point average
//! - [`find_best_plane`]: least-squares plane through a point set
//!
//! # Example
//!
//! ```
//! use stitchwork::algo::projection::planar_project;
//! use nalgebra::{Point3, Vector3};
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//! ];
//! let uvs = planar_project(&points, &[0, 1, 2], &Vector3::z());
//!
//! // Facing +Z: U runs along -X, V along +Y.
//! assert!((uvs[1].x + 1.0).abs() < 1e-10);
//! assert!((uvs[2].y - 2.0).abs() < 1e-10);
//! ```

use std::f64::consts::PI;

use nalgebra::{Point2, Point3, Vector3};

use crate::mesh::{EditableMesh, FaceId};

/// Components closer than this are treated as equal when picking an axis.
const AXIS_EPSILON: f64 = 1e-4;

/// One of the six axis directions used to pick a projection plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionAxis {
    /// +X.
    X,
    /// +Y.
    Y,
    /// +Z.
    Z,
    /// -X.
    XNegative,
    /// -Y.
    YNegative,
    /// -Z.
    ZNegative,
}

impl ProjectionAxis {
    /// All six axes.
    pub const ALL: [ProjectionAxis; 6] = [
        ProjectionAxis::X,
        ProjectionAxis::Y,
        ProjectionAxis::Z,
        ProjectionAxis::XNegative,
        ProjectionAxis::YNegative,
        ProjectionAxis::ZNegative,
    ];

    /// Classify a direction by its dominant component.
    ///
    /// X wins only when it is clearly larger than both Y and Z; otherwise Y
    /// wins when clearly larger than Z; ties fall through to Z.
    pub fn from_direction(dir: &Vector3<f64>) -> Self {
        let (x, y, z) = (dir.x.abs(), dir.y.abs(), dir.z.abs());

        if !approx(x, y) && x > y && !approx(x, z) && x > z {
            if dir.x > 0.0 {
                ProjectionAxis::X
            } else {
                ProjectionAxis::XNegative
            }
        } else if !approx(y, z) && y > z {
            if dir.y > 0.0 {
                ProjectionAxis::Y
            } else {
                ProjectionAxis::YNegative
            }
        } else if dir.z > 0.0 {
            ProjectionAxis::Z
        } else {
            ProjectionAxis::ZNegative
        }
    }

    /// Unit vector of this axis.
    pub fn to_vector(self) -> Vector3<f64> {
        match self {
            ProjectionAxis::X => Vector3::x(),
            ProjectionAxis::Y => Vector3::y(),
            ProjectionAxis::Z => Vector3::z(),
            ProjectionAxis::XNegative => -Vector3::x(),
            ProjectionAxis::YNegative => -Vector3::y(),
            ProjectionAxis::ZNegative => -Vector3::z(),
        }
    }

    /// Reference direction used to orient the U axis of a planar projection.
    pub fn tangent(self) -> Vector3<f64> {
        match self {
            ProjectionAxis::Y | ProjectionAxis::YNegative => Vector3::z(),
            _ => Vector3::y(),
        }
    }
}

#[inline]
fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < AXIS_EPSILON
}

/// U and V axes of the plane facing `direction`.
fn plane_axes(direction: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let tangent = ProjectionAxis::from_direction(direction).tangent();
    let u = direction.cross(&tangent).normalize();
    let v = u.cross(direction).normalize();
    (u, v)
}

/// Project `positions[indices[..]]` onto the plane facing `direction`.
///
/// The output has one coordinate per entry of `indices`. The in-plane basis
/// depends only on which axis `direction` is closest to, so faces with the
/// same orientation project consistently. A zero `direction` yields NaN.
pub fn planar_project(
    positions: &[Point3<f64>],
    indices: &[usize],
    direction: &Vector3<f64>,
) -> Vec<Point2<f64>> {
    let (u, v) = plane_axes(direction);
    indices
        .iter()
        .map(|&i| {
            let p = positions[i].coords;
            Point2::new(u.dot(&p), v.dot(&p))
        })
        .collect()
}

/// Like [`planar_project`], but writes `out[i]` for each `i` in `indices`.
///
/// `out` is aligned with `positions`, so a UV channel can be passed directly.
pub fn planar_project_into(
    positions: &[Point3<f64>],
    indices: &[usize],
    direction: &Vector3<f64>,
    out: &mut [Point2<f64>],
) {
    let (u, v) = plane_axes(direction);
    for &i in indices {
        let p = positions[i].coords;
        out[i] = Point2::new(u.dot(&p), v.dot(&p));
    }
}

/// Least-squares plane through `points[indices[..]]`.
///
/// Returns the unit normal and the centroid. The normal is found by solving
/// the covariance system along the axis with the largest determinant, so its
/// sign is arbitrary. Fewer than three non-collinear points give NaN.
pub fn find_best_plane(points: &[Point3<f64>], indices: &[usize]) -> (Vector3<f64>, Point3<f64>) {
    let sum: Vector3<f64> = indices.iter().map(|&i| points[i].coords).sum();
    let centroid = Point3::from(sum / indices.len() as f64);

    let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for &i in indices {
        let r = points[i] - centroid;
        xx += r.x * r.x;
        xy += r.x * r.y;
        xz += r.x * r.z;
        yy += r.y * r.y;
        yz += r.y * r.z;
        zz += r.z * r.z;
    }

    let det_x = yy * zz - yz * yz;
    let det_y = xx * zz - xz * xz;
    let det_z = xx * yy - xy * xy;

    let normal = if det_x > det_y && det_x > det_z {
        Vector3::new(1.0, (xz * yz - xy * zz) / det_x, (xy * yz - xz * yy) / det_x)
    } else if det_y > det_z {
        Vector3::new((yz * xz - xy * zz) / det_y, 1.0, (xy * xz - yz * xx) / det_y)
    } else {
        Vector3::new((yz * xy - xz * yy) / det_z, (xz * xy - yz * xx) / det_z, 1.0)
    };

    (normal.normalize(), centroid)
}

/// Planar projection along the best-fit plane of the points themselves.
pub fn planar_project_best_fit(positions: &[Point3<f64>], indices: &[usize]) -> Vec<Point2<f64>> {
    let (normal, _) = find_best_plane(positions, indices);
    planar_project(positions, indices, &normal)
}

/// Spherical projection about the average of `positions[indices[..]]`.
///
/// U is the longitude in the XZ plane and V the latitude, both in `[0, 1]`.
/// A point coinciding with the average gives NaN.
pub fn spherical_project(positions: &[Point3<f64>], indices: &[usize]) -> Vec<Point2<f64>> {
    let sum: Vector3<f64> = indices.iter().map(|&i| positions[i].coords).sum();
    let center = Point3::from(sum / indices.len() as f64);

    indices
        .iter()
        .map(|&i| {
            let p = (positions[i] - center).normalize();
            Point2::new(0.5 + p.z.atan2(p.x) / (2.0 * PI), 0.5 - p.y.asin() / PI)
        })
        .collect()
}

/// Faces sharing one box-projection axis.
#[derive(Debug, Clone)]
pub struct AxisGroup {
    /// The axis the group was projected along.
    pub axis: ProjectionAxis,
    /// Member faces, in input order.
    pub faces: Vec<FaceId>,
    /// Distinct indices of the member faces, concatenated.
    pub indices: Vec<usize>,
    /// Projected coordinates, aligned with `indices`.
    pub uvs: Vec<Point2<f64>>,
}

/// Box projection: classify each face normal to an axis and planar-project
/// each axis group along it.
///
/// Groups are returned in order of first appearance.
pub fn box_project(mesh: &EditableMesh, faces: &[FaceId]) -> Vec<AxisGroup> {
    let mut groups: Vec<AxisGroup> = Vec::new();

    for &f in faces {
        let axis = ProjectionAxis::from_direction(&mesh.face_normal(f));
        let slot = match groups.iter().position(|g| g.axis == axis) {
            Some(slot) => slot,
            None => {
                groups.push(AxisGroup {
                    axis,
                    faces: Vec::new(),
                    indices: Vec::new(),
                    uvs: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.faces.push(f);
        group.indices.extend_from_slice(mesh.face(f).distinct_indices());
    }

    for group in &mut groups {
        group.uvs = planar_project(mesh.positions(), &group.indices, &group.axis.to_vector());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_cube;
    use std::collections::HashSet;

    #[test]
    fn test_axis_classification() {
        assert_eq!(ProjectionAxis::from_direction(&Vector3::new(0.9, 0.1, 0.2)), ProjectionAxis::X);
        assert_eq!(
            ProjectionAxis::from_direction(&Vector3::new(0.1, -0.9, 0.2)),
            ProjectionAxis::YNegative
        );
        assert_eq!(ProjectionAxis::from_direction(&Vector3::new(0.0, 0.0, -1.0)), ProjectionAxis::ZNegative);

        // Ties fall through to the later axis.
        assert_eq!(ProjectionAxis::from_direction(&Vector3::new(1.0, 1.0, 0.0)), ProjectionAxis::Y);
        assert_eq!(ProjectionAxis::from_direction(&Vector3::new(1.0, 1.0, 1.0)), ProjectionAxis::Z);

        for axis in ProjectionAxis::ALL {
            assert_eq!(ProjectionAxis::from_direction(&axis.to_vector()), axis);
        }
    }

    #[test]
    fn test_planar_project_bases() {
        let p = vec![Point3::new(1.0, 2.0, 3.0)];

        let uv = planar_project(&p, &[0], &Vector3::z());
        assert!((uv[0] - Point2::new(-1.0, 2.0)).norm() < 1e-10);

        let uv = planar_project(&p, &[0], &Vector3::x());
        assert!((uv[0] - Point2::new(3.0, 2.0)).norm() < 1e-10);

        let uv = planar_project(&p, &[0], &Vector3::y());
        assert!((uv[0] - Point2::new(1.0, 3.0)).norm() < 1e-10);
    }

    #[test]
    fn test_planar_project_preserves_lengths_in_plane() {
        let normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let p = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 2.0)];
        let uv = planar_project(&p, &[0, 1], &normal);
        assert!(((uv[1] - uv[0]).norm() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_planar_project_into_matches() {
        let p = vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), Point3::new(5.0, 5.0, 5.0)];
        let mut out = vec![Point2::new(9.0, 9.0); 3];
        planar_project_into(&p, &[0, 1], &Vector3::z(), &mut out);

        let expected = planar_project(&p, &[0, 1], &Vector3::z());
        assert_eq!(&out[..2], &expected[..]);
        assert_eq!(out[2], Point2::new(9.0, 9.0));
    }

    #[test]
    fn test_find_best_plane() {
        // Points on the plane x + z = 1.
        let p = vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let (n, c) = find_best_plane(&p, &[0, 1, 2, 3]);
        let expected = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert!(n.dot(&expected).abs() > 1.0 - 1e-10);
        assert!((c - Point3::new(0.5, 0.5, 0.5)).norm() < 1e-10);
    }

    #[test]
    fn test_spherical_project() {
        let p = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let uv = spherical_project(&p, &[0, 1, 2, 3]);
        assert!((uv[0] - Point2::new(0.5, 0.5)).norm() < 1e-10);
        assert!((uv[1].x - 1.0).abs() < 1e-10);
        assert!((uv[2].y - 0.0).abs() < 1e-10);
        assert!((uv[3].y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_box_project_cube() {
        let mesh = build_cube(1.0).unwrap();
        let faces: Vec<FaceId> = mesh.face_ids().collect();
        let groups = box_project(&mesh, &faces);

        assert_eq!(groups.len(), 6);
        for group in &groups {
            assert_eq!(group.faces.len(), 1);
            assert_eq!(group.indices.len(), 4);
            assert_eq!(group.uvs.len(), 4);
            assert!(group.uvs.iter().all(|uv| uv.x.is_finite() && uv.y.is_finite()));
        }

        let axes: HashSet<ProjectionAxis> = groups.iter().map(|g| g.axis).collect();
        assert_eq!(axes.len(), 6);
    }
}
