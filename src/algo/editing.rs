//! Explicit UV edits: projection of face sets, welding and splitting.
//!
//! Unlike [`super::unwrap`], these operations write coordinates directly
//! into a channel. Box and spherical projection mark the faces they touch as
//! manual so a later refresh does not overwrite the result.
//!
//! # Example
//!
//! ```
//! use stitchwork::algo::editing::{project_faces_box, sew_uvs, SewOutcome};
//! use stitchwork::mesh::{build_cube, FaceId, UvChannel};
//!
//! let mut mesh = build_cube(1.0).unwrap();
//! let faces: Vec<FaceId> = mesh.face_ids().collect();
//! project_faces_box(&mut mesh, &faces, UvChannel::Uv0);
//!
//! // Box projection splits every coordinate, and seams between differently
//! // projected faces are too far apart to weld.
//! assert_eq!(mesh.shared_textures().class_count(), 24);
//! assert!(mesh.faces().iter().all(|f| f.manual_uv));
//! ```

use nalgebra::{Point2, Vector3};

use super::projection::{box_project, planar_project, spherical_project};
use super::unwrap::write_channel;
use crate::mesh::{Bounds2, EditableMesh, FaceId, UvChannel};

/// Options for [`project_faces_auto_with_options`].
#[derive(Debug, Clone)]
pub struct AutoProjectOptions {
    /// Coordinates closer than this are welded after projection.
    pub sew_distance: f64,
}

impl Default for AutoProjectOptions {
    fn default() -> Self {
        Self { sew_distance: 0.001 }
    }
}

impl AutoProjectOptions {
    /// Set the weld distance.
    pub fn with_sew_distance(mut self, distance: f64) -> Self {
        self.sew_distance = distance;
        self
    }
}

/// Result of a sew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SewOutcome {
    /// At least one pair was welded.
    Sewn {
        /// Number of class merges performed.
        merged: usize,
    },
    /// No pair was close enough, or every close pair was already welded.
    NothingToSew,
}

/// Project faces together along their averaged normal, then weld seams
/// between them.
pub fn project_faces_auto(mesh: &mut EditableMesh, faces: &[FaceId], channel: UvChannel) {
    project_faces_auto_with_options(mesh, faces, channel, &AutoProjectOptions::default());
}

/// [`project_faces_auto`] with explicit options.
pub fn project_faces_auto_with_options(
    mesh: &mut EditableMesh,
    faces: &[FaceId],
    channel: UvChannel,
    options: &AutoProjectOptions,
) {
    if faces.is_empty() {
        return;
    }

    let sum: Vector3<f64> = faces.iter().map(|&f| mesh.face_normal(f)).sum();
    let direction = sum / faces.len() as f64;
    let indices = mesh.distinct_indices_of(faces);

    let projected = planar_project(mesh.positions(), &indices, &direction);
    write_channel(mesh, channel, &indices, projected);

    for &f in faces {
        mesh.face_mut(f).element_group = None;
    }
    mesh.shared_textures_mut().split(&indices);

    let outcome = sew_channel(mesh, &indices, options.sew_distance, channel);
    log::debug!("auto-projected {} faces: {:?}", faces.len(), outcome);
}

/// Project each face along the axis closest to its normal.
///
/// Faces are marked manual and every coordinate of each axis group is split
/// from its previous texture sharing.
pub fn project_faces_box(mesh: &mut EditableMesh, faces: &[FaceId], channel: UvChannel) {
    box_project_with(mesh, faces, channel, None);
}

/// Like [`project_faces_box`], but each axis group is translated so its
/// smallest coordinate sits at `lower_left`.
pub fn project_faces_box_anchored(
    mesh: &mut EditableMesh,
    faces: &[FaceId],
    lower_left: Point2<f64>,
    channel: UvChannel,
) {
    box_project_with(mesh, faces, channel, Some(lower_left));
}

fn box_project_with(mesh: &mut EditableMesh, faces: &[FaceId], channel: UvChannel, anchor: Option<Point2<f64>>) {
    let groups = box_project(mesh, faces);
    log::debug!("box projection: {} faces in {} axis groups", faces.len(), groups.len());

    for &f in faces {
        let face = mesh.face_mut(f);
        face.element_group = None;
        face.manual_uv = true;
    }

    for group in groups {
        let mut uvs = group.uvs;
        if let Some(lower_left) = anchor {
            let min = Bounds2::from_points(&uvs).min;
            for uv in &mut uvs {
                *uv = lower_left + (*uv - min);
            }
        }

        write_channel(mesh, channel, &group.indices, uvs);
        mesh.shared_textures_mut().split(&group.indices);
    }
}

/// Spherically project `indices`.
///
/// Every face that uses any of the indices is marked manual.
pub fn project_faces_sphere(mesh: &mut EditableMesh, indices: &[usize], channel: UvChannel) {
    if indices.is_empty() {
        return;
    }

    let touched: Vec<FaceId> = mesh
        .face_ids()
        .filter(|&f| indices.iter().any(|&i| mesh.face(f).contains(i)))
        .collect();
    for f in touched {
        let face = mesh.face_mut(f);
        face.element_group = None;
        face.manual_uv = true;
    }

    mesh.shared_textures_mut().split(indices);
    let projected = spherical_project(mesh.positions(), indices);
    write_channel(mesh, channel, indices, projected);
}

/// Weld every pair of channel-0 coordinates in `indices` closer than `delta`.
///
/// Welded pairs move to their midpoint and join one texture class. Pairs
/// further apart are left untouched.
pub fn sew_uvs(mesh: &mut EditableMesh, indices: &[usize], delta: f64) -> SewOutcome {
    let outcome = sew_channel(mesh, indices, delta, UvChannel::Uv0);
    log::debug!("sew of {} coordinates: {:?}", indices.len(), outcome);
    outcome
}

fn sew_channel(mesh: &mut EditableMesh, indices: &[usize], delta: f64, channel: UvChannel) -> SewOutcome {
    let (uvs, shared) = mesh.channel_and_textures_mut(channel);
    match shared.sew(uvs, indices, delta) {
        0 => SewOutcome::NothingToSew,
        merged => SewOutcome::Sewn { merged },
    }
}

/// Move every channel-0 coordinate in `indices` to their mean and weld them.
pub fn collapse_uvs(mesh: &mut EditableMesh, indices: &[usize]) {
    let (uvs, shared) = mesh.channel_and_textures_mut(UvChannel::Uv0);
    shared.collapse(uvs, indices);
}

/// Give each index its own new texture class.
pub fn split_uvs(mesh: &mut EditableMesh, indices: &[usize]) {
    mesh.shared_textures_mut().split(indices);
}

/// Split the texture classes of every distinct index of `faces`.
pub fn split_face_uvs(mesh: &mut EditableMesh, faces: &[FaceId]) {
    let indices = mesh.distinct_indices_of(faces);
    split_uvs(mesh, &indices);
}

/// Translate points to start at the origin and scale uniformly so the largest
/// coordinate becomes 1.
pub fn fit_uvs(uvs: &mut [Point2<f64>]) {
    if uvs.is_empty() {
        return;
    }

    let min = Bounds2::from_points(uvs).min;
    for uv in uvs.iter_mut() {
        *uv = Point2::from(*uv - min);
    }

    let max = Bounds2::from_points(uvs).max;
    let mut scale = max.x.max(max.y);
    if scale == 0.0 {
        scale = 1.0;
    }
    for uv in uvs.iter_mut() {
        *uv = Point2::from(uv.coords / scale);
    }
}
