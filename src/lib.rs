//! # Stitchwork
//!
//! UV projection, unwrap settings and seam stitching for editable polygon
//! meshes.
//!
//! Stitchwork works on an [`EditableMesh`](mesh::EditableMesh) whose faces
//! own their vertices. Faces are connected through a shared-vertex table, and
//! UV seams are welded through a shared-texture table. Each face carries
//! [`UnwrapSettings`](mesh::UnwrapSettings) that describe how its automatic
//! UVs are produced from a planar projection.
//!
//! ## Features
//!
//! - **Projection**: planar, best-fit planar, box and spherical projection
//! - **Automatic UVs**: per-face and per-texture-group unwrap driven by
//!   stored fill, anchor, rotation, scale, flip and offset settings
//! - **Stitching**: align one face's UVs to a neighbour along their shared
//!   edge and weld the seam
//! - **Editing**: sew, collapse and split texture coordinates
//! - **Transform recovery**: derive settings that regenerate a hand-edited
//!   layout from a fresh projection
//!
//! ## Quick Start
//!
//! ```
//! use stitchwork::prelude::*;
//! use nalgebra::Point2;
//!
//! let mut mesh = build_cube(1.0).unwrap();
//! refresh_all(&mut mesh);
//!
//! // Rotate the +Z face's UVs by a quarter turn and regenerate it.
//! let settings = UnwrapSettings::default().with_rotation(90.0);
//! apply_unwrap_settings(&mut mesh, UnwrapTarget::Face(FaceId::new(4)), settings);
//!
//! // Then stitch the +Y face onto it.
//! assert!(auto_stitch(&mut mesh, FaceId::new(4), FaceId::new(2), UvChannel::Uv0));
//! assert!(mesh.textures().iter().all(|uv: &Point2<f64>| uv.x.is_finite()));
//! ```
//!
//! ## Welding Seams
//!
//! ```
//! use stitchwork::prelude::*;
//! use nalgebra::Point3;
//!
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
//! let mut mesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [4, 5, 6, 7]]).unwrap();
//! refresh_all(&mut mesh);
//!
//! // The quads touch along x = 1, so their UVs can be welded there.
//! let outcome = sew_uvs(&mut mesh, &[1, 2, 4, 7], 0.001);
//! assert_eq!(outcome, SewOutcome::Sewn { merged: 2 });
//! assert!(mesh.shared_textures().same_class(1, 4));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use stitchwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::editing::{
        collapse_uvs, project_faces_auto, project_faces_box, project_faces_sphere, sew_uvs,
        split_uvs, SewOutcome,
    };
    pub use crate::algo::stitch::auto_stitch;
    pub use crate::algo::unwrap::{
        apply_unwrap_settings, refresh_all, refresh_uv, set_auto_uv, UnwrapTarget,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_cube, build_from_quads, build_from_triangles, Anchor, EditableMesh, Face, FaceId,
        Fill, UnwrapSettings, UvChannel,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::mesh::build_grid;

    #[test]
    fn test_stitched_grid_survives_refresh() {
        let mut mesh = build_grid(2).unwrap();
        refresh_all(&mut mesh);

        let pairs = [(0, 1), (0, 2), (1, 3)];
        for (a, b) in pairs {
            assert!(auto_stitch(&mut mesh, FaceId::new(a), FaceId::new(b), UvChannel::Uv0));
        }
        assert!(mesh.shared_textures().same_class(1, 4));
        assert!(mesh.shared_textures().same_class(3, 8));

        // Stitched auto faces store their transform, so a refresh is stable.
        let stitched = mesh.textures().to_vec();
        refresh_all(&mut mesh);
        for (a, b) in stitched.iter().zip(mesh.textures()) {
            assert!((a - b).norm() < 1e-9, "{:?} vs {:?}", a, b);
        }
        assert!(mesh.faces().iter().all(|f| !f.manual_uv));
    }

    #[test]
    fn test_manual_faces_keep_their_uvs() {
        let mut mesh = build_cube(2.0).unwrap();
        let faces: Vec<FaceId> = mesh.face_ids().collect();
        project_faces_box(&mut mesh, &faces, UvChannel::Uv0);
        let boxed = mesh.textures().to_vec();

        refresh_all(&mut mesh);
        assert_eq!(mesh.textures(), &boxed[..]);
    }
}
