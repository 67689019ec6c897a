//! Per-face automatic unwrap settings.
//!
//! Auto-UV faces regenerate their coordinates from a fresh planar projection
//! every time they are refreshed. [`UnwrapSettings`] is the persistent record
//! describing how that raw projection is turned into the final layout; see
//! [`crate::algo::unwrap::apply_settings`] for the order in which the fields
//! are applied.

use nalgebra::Vector2;

/// How projected coordinates are resized before the user transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    /// Keep the projection at world scale.
    #[default]
    Tile,
    /// Uniformly rescale so the larger bounding-box dimension becomes 1.
    Fit,
    /// Rescale each axis independently to a unit bounding box.
    Stretch,
}

/// Where the projected bounds are justified relative to the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Top left corner.
    UpperLeft,
    /// Top edge, centered horizontally.
    UpperCenter,
    /// Top right corner.
    UpperRight,
    /// Left edge, centered vertically.
    MiddleLeft,
    /// Center.
    MiddleCenter,
    /// Right edge, centered vertically.
    MiddleRight,
    /// Bottom left corner.
    LowerLeft,
    /// Bottom edge, centered horizontally.
    LowerCenter,
    /// Bottom right corner.
    LowerRight,
}

impl Anchor {
    /// All nine anchors, row by row from the top.
    pub const ALL: [Anchor; 9] = [
        Anchor::UpperLeft,
        Anchor::UpperCenter,
        Anchor::UpperRight,
        Anchor::MiddleLeft,
        Anchor::MiddleCenter,
        Anchor::MiddleRight,
        Anchor::LowerLeft,
        Anchor::LowerCenter,
        Anchor::LowerRight,
    ];

    /// Horizontal placement: -1 left, 0 center, 1 right.
    pub(crate) fn column(self) -> i8 {
        match self {
            Anchor::UpperLeft | Anchor::MiddleLeft | Anchor::LowerLeft => -1,
            Anchor::UpperRight | Anchor::MiddleRight | Anchor::LowerRight => 1,
            _ => 0,
        }
    }

    /// Vertical placement: 1 upper, 0 middle, -1 lower.
    pub(crate) fn row(self) -> i8 {
        match self {
            Anchor::UpperLeft | Anchor::UpperCenter | Anchor::UpperRight => 1,
            Anchor::MiddleLeft | Anchor::MiddleCenter | Anchor::MiddleRight => 0,
            _ => -1,
        }
    }
}

/// Settings applied to a face's raw planar projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnwrapSettings {
    /// Project in world space (through the mesh transform) instead of model space.
    /// World-space projections are never anchored.
    pub use_world_space: bool,

    /// Negate the U coordinate.
    pub flip_u: bool,

    /// Negate the V coordinate.
    pub flip_v: bool,

    /// Exchange U and V (after flipping).
    pub swap_uv: bool,

    /// Fill mode.
    pub fill: Fill,

    /// Justification, or `None` to leave the projection where it lands.
    pub anchor: Option<Anchor>,

    /// Subtracted from every coordinate as the final step.
    pub offset: Vector2<f64>,

    /// Rotation in degrees (clockwise in UV space).
    pub rotation: f64,

    /// Non-uniform scale.
    pub scale: Vector2<f64>,
}

impl Default for UnwrapSettings {
    fn default() -> Self {
        Self {
            use_world_space: false,
            flip_u: false,
            flip_v: false,
            swap_uv: false,
            fill: Fill::Tile,
            anchor: None,
            offset: Vector2::zeros(),
            rotation: 0.0,
            scale: Vector2::new(1.0, 1.0),
        }
    }
}

impl UnwrapSettings {
    /// Set the fill mode.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Set the anchor.
    pub fn with_anchor(mut self, anchor: Option<Anchor>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the offset.
    pub fn with_offset(mut self, offset: Vector2<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: Vector2<f64>) -> Self {
        self.scale = scale;
        self
    }

    /// Set the flip-U flag.
    pub fn with_flip_u(mut self, flip: bool) -> Self {
        self.flip_u = flip;
        self
    }

    /// Set the flip-V flag.
    pub fn with_flip_v(mut self, flip: bool) -> Self {
        self.flip_v = flip;
        self
    }

    /// Set the swap-UV flag.
    pub fn with_swap_uv(mut self, swap: bool) -> Self {
        self.swap_uv = swap;
        self
    }

    /// Set the world-space flag.
    pub fn with_world_space(mut self, world: bool) -> Self {
        self.use_world_space = world;
        self
    }

    /// True when scale or rotation differ from the identity.
    pub fn has_transform(&self) -> bool {
        self.scale.x != 1.0 || self.scale.y != 1.0 || self.rotation != 0.0
    }
}
