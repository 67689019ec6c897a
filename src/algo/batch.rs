//! Sequential operations over several meshes.
//!
//! Each mesh is processed in turn. The [`Progress`] cancel flag is checked
//! before each mesh, so a cancelled batch leaves the meshes it already
//! reached modified and the rest untouched.

use super::progress::Progress;
use super::unwrap::refresh_all;
use crate::mesh::EditableMesh;

/// What a batch loop got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Meshes the operation ran on.
    pub processed: usize,
    /// True if the loop stopped early because of cancellation.
    pub cancelled: bool,
}

/// Run `op` on every mesh, reporting progress and honouring cancellation.
pub fn for_each_mesh<F>(meshes: &mut [EditableMesh], progress: &Progress, message: &str, mut op: F) -> BatchSummary
where
    F: FnMut(&mut EditableMesh),
{
    let total = meshes.len();

    for (i, mesh) in meshes.iter_mut().enumerate() {
        if progress.is_cancelled() {
            log::debug!("{} cancelled after {} of {} meshes", message, i, total);
            return BatchSummary {
                processed: i,
                cancelled: true,
            };
        }

        progress.report(i, total, message);
        op(mesh);
    }

    progress.report(total, total, message);
    BatchSummary {
        processed: total,
        cancelled: false,
    }
}

/// Regenerate the automatic UVs of every face of every mesh.
pub fn refresh_meshes(meshes: &mut [EditableMesh], progress: &Progress) -> BatchSummary {
    for_each_mesh(meshes, progress, "Refreshing UVs", refresh_all)
}
