//! Error types for stitchwork.
//!
//! Only mesh construction and explicit validation report errors. UV operations
//! report expected outcomes through their return values instead (see
//! [`crate::algo::editing::SewOutcome`] and [`crate::algo::stitch::auto_stitch`]).

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an index outside the position array.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices within one triangle.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face's index list is not a whole number of triangles.
    #[error("face {face} has {len} indices, which is not a multiple of 3")]
    IncompleteTriangles {
        /// The face index.
        face: usize,
        /// Number of indices in the face.
        len: usize,
    },

    /// A UV array does not line up with the position array.
    #[error("UV channel {channel} has {len} coordinates but the mesh has {expected} vertices")]
    UvLengthMismatch {
        /// The UV channel number.
        channel: usize,
        /// Length of the supplied array.
        len: usize,
        /// Number of mesh vertices.
        expected: usize,
    },

    /// A shared-vertex group references an index outside the position array.
    #[error("shared group {group} references invalid vertex index {vertex}")]
    InvalidSharedIndex {
        /// The group index.
        group: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MeshError::InvalidVertexIndex { face: 2, vertex: 17 };
        assert_eq!(err.to_string(), "face 2 references invalid vertex index 17");

        let err = MeshError::invalid_param("sew_distance", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: sew_distance = -1 (must be positive)"
        );
    }
}
