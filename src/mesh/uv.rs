//! UV channels and 2D point helpers.
//!
//! UV coordinates are stored as `Point2<f64>` arrays aligned 1:1 with the mesh
//! position array. Most operations work on an indexed subset of such an array,
//! so the helpers here take `(points, indices)` pairs rather than copying.

use nalgebra::{Point2, Vector2};

/// One of the four UV channels a mesh can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UvChannel {
    /// Primary texture coordinates. Auto-UV faces always write here.
    #[default]
    Uv0,
    /// Secondary channel, usually baked lighting. Stored but otherwise opaque.
    Uv1,
    /// General purpose.
    Uv2,
    /// General purpose.
    Uv3,
}

impl UvChannel {
    /// All channels in order.
    pub const ALL: [UvChannel; 4] = [UvChannel::Uv0, UvChannel::Uv1, UvChannel::Uv2, UvChannel::Uv3];

    /// Channel number (0..=3).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            UvChannel::Uv0 => 0,
            UvChannel::Uv1 => 1,
            UvChannel::Uv2 => 2,
            UvChannel::Uv3 => 3,
        }
    }
}

/// An axis-aligned 2D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Minimum corner.
    pub min: Point2<f64>,
    /// Maximum corner.
    pub max: Point2<f64>,
}

impl Bounds2 {
    /// Bounds of `points[indices[..]]`.
    ///
    /// An empty index list gives inverted infinite bounds.
    pub fn from_indexed(points: &[Point2<f64>], indices: &[usize]) -> Self {
        Self::enclosing(indices.iter().map(|&i| points[i]))
    }

    /// Bounds of every point in `points`.
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        Self::enclosing(points.iter().copied())
    }

    fn enclosing(iter: impl Iterator<Item = Point2<f64>>) -> Self {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for uv in iter {
            min.x = min.x.min(uv.x);
            min.y = min.y.min(uv.y);
            max.x = max.x.max(uv.x);
            max.y = max.y.max(uv.y);
        }

        Self { min, max }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Width and height of the box.
    #[inline]
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }
}

/// Rotate `point` about `origin` by `degrees`, clockwise.
#[inline]
pub fn rotate_around(point: Point2<f64>, origin: Point2<f64>, degrees: f64) -> Point2<f64> {
    let (s, c) = degrees.to_radians().sin_cos();
    let p = point - origin;
    Point2::new(origin.x + p.x * c + p.y * s, origin.y - p.x * s + p.y * c)
}

/// Scale `point` about `origin` component-wise.
#[inline]
pub fn scale_around(point: Point2<f64>, origin: Point2<f64>, scale: Vector2<f64>) -> Point2<f64> {
    origin + (point - origin).component_mul(&scale)
}

/// Arithmetic mean of `points[indices[..]]`.
pub fn average(points: &[Point2<f64>], indices: &[usize]) -> Point2<f64> {
    let sum: Vector2<f64> = indices.iter().map(|&i| points[i].coords).sum();
    Point2::from(sum / indices.len() as f64)
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Zero-length input yields NaN.
#[inline]
pub fn angle_between(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    let cos = a.dot(b) / (a.norm() * b.norm());
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Z component of the 3D cross product of two 2D vectors.
#[inline]
pub fn cross_z(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
