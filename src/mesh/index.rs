//! Index types for mesh elements.
//!
//! Vertex indices stay plain `usize` values because callers hand them over as
//! raw arrays (triangle lists, selections). Faces and winged edges get
//! type-safe wrappers so the two cannot be mixed up with vertex indices.

use std::fmt::{self, Debug};

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// A type-safe index into a [`WingedEdges`](super::WingedEdges) arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

const INVALID: u32 = u32::MAX;

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(FaceId, "F");
impl_index_type!(HalfEdgeId, "HE");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_id() {
        let f = FaceId::new(42);
        assert_eq!(f.index(), 42);
        assert!(f.is_valid());
        assert!(!FaceId::invalid().is_valid());
        assert_eq!(FaceId::default(), FaceId::invalid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", FaceId::new(3)), "F(3)");
        assert_eq!(format!("{:?}", HalfEdgeId::new(7)), "HE(7)");
        assert_eq!(format!("{:?}", HalfEdgeId::invalid()), "HE(INVALID)");
    }
}
