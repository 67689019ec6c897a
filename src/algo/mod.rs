//! UV operations on [`EditableMesh`](crate::mesh::EditableMesh).
//!
//! - **Projection**: planar, box and spherical projection primitives
//! - **Transform**: recovering rotation, scale and translation between layouts
//! - **Unwrap**: automatic per-face UVs driven by stored settings
//! - **Editing**: explicit projection, sewing, collapsing and splitting
//! - **Stitch**: aligning adjacent faces along their shared edge
//! - **Batch**: sequential loops over several meshes with cancellation

pub mod batch;
pub mod editing;
pub mod progress;
pub mod projection;
pub mod stitch;
pub mod transform;
pub mod unwrap;

pub use progress::Progress;
