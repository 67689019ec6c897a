//! Automatic unwrapping driven by per-face settings.
//!
//! An auto-UV face never stores its coordinates as the source of truth.
//! Each refresh planar-projects it again and runs [`apply_settings`] over the
//! result, so editing positions or settings always yields a consistent layout.
//! Manual-UV faces are skipped by every refresh.
//!
//! # Settings order
//!
//! [`apply_settings`] applies the fields of [`UnwrapSettings`] in a fixed order:
//!
//! 1. Fill ([`Fill::Fit`] or [`Fill::Stretch`] rescale; [`Fill::Tile`] does nothing)
//! 2. Scale then clockwise rotation, both about the bounding-box center,
//!    after which the bounds are re-centered on that point
//! 3. Anchor justification (model space only)
//! 4. Flip U, flip V, then swap
//! 5. Offset subtraction
//!
//! # Example
//!
//! ```
//! use stitchwork::algo::unwrap::refresh_all;
//! use stitchwork::mesh::{build_cube, Anchor, FaceId};
//!
//! let mut mesh = build_cube(2.0).unwrap();
//! mesh.face_mut(FaceId::new(0)).uv.anchor = Some(Anchor::LowerLeft);
//! refresh_all(&mut mesh);
//!
//! let uvs = mesh.textures();
//! let min_u = mesh.face(FaceId::new(0)).distinct_indices().iter()
//!     .map(|&i| uvs[i].x)
//!     .fold(f64::INFINITY, f64::min);
//! assert!(min_u.abs() < 1e-10);
//! ```

use nalgebra::{Point2, Point3, Vector3};

use super::projection::planar_project;
use super::transform::calculate_delta;
use crate::mesh::{
    rotate_around, scale_around, Anchor, Bounds2, EditableMesh, FaceId, Fill, UnwrapSettings, UvChannel,
};

/// Apply unwrap settings to `uvs[indices[..]]` in place.
pub fn apply_settings(uvs: &mut [Point2<f64>], indices: &[usize], settings: &UnwrapSettings) {
    if indices.is_empty() {
        return;
    }

    let mut bounds = Bounds2::from_indexed(uvs, indices);

    match settings.fill {
        Fill::Tile => {}
        Fill::Fit => {
            let size = bounds.size();
            let max = size.x.max(size.y);
            for &i in indices {
                uvs[i] = Point2::from(uvs[i].coords / max);
            }
            bounds = Bounds2::from_indexed(uvs, indices);
        }
        Fill::Stretch => {
            let size = bounds.size();
            for &i in indices {
                uvs[i] = Point2::from(uvs[i].coords.component_div(&size));
            }
            bounds = Bounds2::from_indexed(uvs, indices);
        }
    }

    if settings.has_transform() {
        let center = bounds.center();
        for &i in indices {
            let scaled = scale_around(uvs[i], center, settings.scale);
            uvs[i] = rotate_around(scaled, center, settings.rotation);
        }

        // Rotation shifts the bounds of asymmetric sets; keep them on `center`.
        let drift = center - Bounds2::from_indexed(uvs, indices).center();
        for &i in indices {
            uvs[i] += drift;
        }
    }

    if !settings.use_world_space {
        if let Some(anchor) = settings.anchor {
            apply_anchor(uvs, indices, anchor);
        }
    }

    if settings.flip_u || settings.flip_v || settings.swap_uv {
        for &i in indices {
            let mut u = uvs[i].x;
            let mut v = uvs[i].y;
            if settings.flip_u {
                u = -u;
            }
            if settings.flip_v {
                v = -v;
            }
            uvs[i] = if settings.swap_uv {
                Point2::new(v, u)
            } else {
                Point2::new(u, v)
            };
        }
    }

    for &i in indices {
        uvs[i] -= settings.offset;
    }
}

/// Translate so the anchor's reference point of the unit square lines up
/// with the same point of the bounds.
fn apply_anchor(uvs: &mut [Point2<f64>], indices: &[usize], anchor: Anchor) {
    let Bounds2 { min, max } = Bounds2::from_indexed(uvs, indices);

    let x = match anchor.column() {
        -1 => min.x,
        1 => max.x - 1.0,
        _ => min.x + (max.x - min.x) * 0.5 - 0.5,
    };
    let y = match anchor.row() {
        1 => max.y - 1.0,
        0 => min.y + (max.y - min.y) * 0.5 - 0.5,
        _ => min.y,
    };

    let shift = nalgebra::Vector2::new(x, y);
    for &i in indices {
        uvs[i] -= shift;
    }
}

/// Planar projection of `indices` along `direction`, through the mesh
/// transform when `world_space` is set.
fn project_along(
    mesh: &EditableMesh,
    indices: &[usize],
    direction: Vector3<f64>,
    world_space: bool,
) -> Vec<Point2<f64>> {
    if !world_space {
        return planar_project(mesh.positions(), indices, &direction);
    }

    let trs = mesh.transform();
    let world: Vec<Point3<f64>> = indices
        .iter()
        .map(|&i| trs.transform_point(&mesh.positions()[i]))
        .collect();
    let linear: Vec<usize> = (0..world.len()).collect();
    planar_project(&world, &linear, &trs.transform_vector(&direction))
}

/// Raw planar projection of a face along its normal.
///
/// The result is aligned with the face's distinct indices and honours its
/// world-space flag. No settings are applied.
pub fn project_face(mesh: &EditableMesh, face: FaceId) -> Vec<Point2<f64>> {
    let f = mesh.face(face);
    project_along(mesh, f.distinct_indices(), mesh.face_normal(face), f.uv.use_world_space)
}

/// Write coordinates aligned with `indices` into a channel.
pub(crate) fn write_channel(
    mesh: &mut EditableMesh,
    channel: UvChannel,
    indices: &[usize],
    projected: Vec<Point2<f64>>,
) {
    let uvs = mesh.uvs_mut(channel);
    for (&i, uv) in indices.iter().zip(projected) {
        uvs[i] = uv;
    }
}

/// Project one face into channel 0 and apply its settings.
pub fn unwrap(mesh: &mut EditableMesh, face: FaceId) {
    let projected = project_face(mesh, face);
    let f = mesh.face(face);
    let indices = f.distinct_indices().to_vec();
    let settings = f.uv;

    write_channel(mesh, UvChannel::Uv0, &indices, projected);
    apply_settings(mesh.uvs_mut(UvChannel::Uv0), &indices, &settings);
}

/// Project every face of a texture group as one unit.
///
/// The projection direction is the sum of the member normals and `settings`
/// is applied over the union of their indices. Does nothing for an empty
/// group.
pub fn project_texture_group(mesh: &mut EditableMesh, group: u32, settings: &UnwrapSettings) {
    let faces = mesh.faces_in_texture_group(group);
    if faces.is_empty() {
        return;
    }

    let direction: Vector3<f64> = faces.iter().map(|&f| mesh.face_normal(f)).sum();
    let indices = mesh.distinct_indices_of(&faces);
    let projected = project_along(mesh, &indices, direction, settings.use_world_space);

    write_channel(mesh, UvChannel::Uv0, &indices, projected);
    apply_settings(mesh.uvs_mut(UvChannel::Uv0), &indices, settings);
}

/// Regenerate the auto-UV faces among `faces`.
///
/// Faces in a texture group are projected once per group using the settings
/// of the first member listed. If channel 0 is out of sync with the positions
/// it is reset, every face becomes auto and the whole mesh is refreshed.
pub fn refresh_uv(mesh: &mut EditableMesh, faces: &[FaceId]) {
    let n = mesh.num_vertices();
    let in_sync = mesh.uvs[0].as_ref().is_some_and(|uvs| uvs.len() == n);

    let faces: Vec<FaceId> = if in_sync {
        faces.to_vec()
    } else {
        log::warn!("texture channel out of sync with {} vertices; rebuilding all faces", n);
        mesh.uvs[0] = Some(vec![Point2::origin(); n]);
        for f in &mut mesh.faces {
            f.manual_uv = false;
        }
        mesh.face_ids().collect()
    };

    let mut projected_groups: Vec<u32> = Vec::new();

    for f in faces {
        let face = mesh.face(f);
        if face.manual_uv {
            continue;
        }
        let (group, settings) = (face.texture_group, face.uv);

        match group {
            None => unwrap(mesh, f),
            Some(group) if !projected_groups.contains(&group) => {
                projected_groups.push(group);
                project_texture_group(mesh, group, &settings);
            }
            Some(_) => {}
        }
    }
}

/// Regenerate every auto-UV face.
pub fn refresh_all(mesh: &mut EditableMesh) {
    let faces: Vec<FaceId> = mesh.face_ids().collect();
    refresh_uv(mesh, &faces);
}

/// Switch faces between automatic and manual UVs.
///
/// Converting to auto recovers settings that reproduce the current layout
/// (see [`set_auto_and_align_unwrap_params_to_uvs`]); faces already auto are
/// left alone. Converting to manual leaves the coordinates untouched and
/// clears the texture group.
pub fn set_auto_uv(mesh: &mut EditableMesh, faces: &[FaceId], auto: bool) {
    if auto {
        let manual: Vec<FaceId> = faces
            .iter()
            .copied()
            .filter(|&f| mesh.face(f).manual_uv)
            .collect();
        set_auto_and_align_unwrap_params_to_uvs(mesh, &manual);
    } else {
        for &f in faces {
            let face = mesh.face_mut(f);
            face.texture_group = None;
            face.manual_uv = true;
        }
    }
}

/// Make faces auto-UV with settings that best reproduce their current
/// channel-0 coordinates.
///
/// Each face is reset to default settings and re-projected, then the
/// transform from that raw projection to the saved coordinates is stored on
/// the face and the face is refreshed once more. Distortion that a similarity
/// transform cannot express is lost.
pub fn set_auto_and_align_unwrap_params_to_uvs(mesh: &mut EditableMesh, faces: &[FaceId]) {
    if faces.is_empty() {
        return;
    }

    let destination = mesh.textures().to_vec();

    for &f in faces {
        let face = mesh.face_mut(f);
        face.uv = UnwrapSettings::default();
        face.element_group = None;
        face.texture_group = None;
        face.manual_uv = false;
    }

    refresh_uv(mesh, faces);

    for &f in faces {
        let delta = {
            let indices = mesh.face(f).indices();
            calculate_delta(mesh.textures(), indices, &destination, indices)
        };
        if delta.is_degenerate() {
            log::warn!("could not recover a UV transform for face {:?}", f);
        }
        delta.apply_to(&mut mesh.face_mut(f).uv);
    }

    refresh_uv(mesh, faces);
}

/// What [`apply_unwrap_settings`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwrapTarget {
    /// A single face.
    Face(FaceId),
    /// Every face of a texture group.
    TextureGroup(u32),
}

/// Store settings on a face or texture group and refresh it.
pub fn apply_unwrap_settings(mesh: &mut EditableMesh, target: UnwrapTarget, settings: UnwrapSettings) {
    let faces = match target {
        UnwrapTarget::Face(f) => vec![f],
        UnwrapTarget::TextureGroup(group) => mesh.faces_in_texture_group(group),
    };

    for &f in &faces {
        mesh.face_mut(f).uv = settings;
    }
    refresh_uv(mesh, &faces);
}

/// Put faces in a new texture group sharing the first face's settings.
///
/// Returns the group id, or `None` if `faces` is empty.
pub fn group_faces(mesh: &mut EditableMesh, faces: &[FaceId]) -> Option<u32> {
    let first = *faces.first()?;
    let group = mesh.unused_texture_group(1);
    let settings = mesh.face(first).uv;

    for &f in faces {
        let face = mesh.face_mut(f);
        face.texture_group = Some(group);
        face.uv = settings;
        face.manual_uv = false;
    }

    log::debug!("grouped {} faces as texture group {}", faces.len(), group);
    refresh_uv(mesh, faces);
    Some(group)
}

/// Remove faces from their texture groups and refresh them individually.
pub fn ungroup_faces(mesh: &mut EditableMesh, faces: &[FaceId]) {
    for &f in faces {
        mesh.face_mut(f).texture_group = None;
    }
    refresh_uv(mesh, faces);
}

/// Copy coordinates from one face to another, pairing their distinct
/// indices in order.
pub fn copy_uvs(mesh: &mut EditableMesh, source: FaceId, dest: FaceId, channel: UvChannel) {
    let pairs: Vec<(usize, usize)> = mesh
        .face(source)
        .distinct_indices()
        .iter()
        .copied()
        .zip(mesh.face(dest).distinct_indices().iter().copied())
        .collect();

    let uvs = mesh.uvs_mut(channel);
    for (src, dst) in pairs {
        uvs[dst] = uvs[src];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::transform::get_uv_transform;
    use crate::mesh::{build_cube, build_from_triangles, build_grid};
    use nalgebra::{Matrix4, Vector2};

    fn face_uvs(mesh: &EditableMesh, f: FaceId) -> Vec<Point2<f64>> {
        let uvs = mesh.textures();
        mesh.face(f).distinct_indices().iter().map(|&i| uvs[i]).collect()
    }

    fn rect() -> Vec<Point2<f64>> {
        vec![
            Point2::new(1.0, 1.0),
            Point2::new(5.0, 1.0),
            Point2::new(5.0, 3.0),
            Point2::new(1.0, 3.0),
        ]
    }

    #[test]
    fn test_identity_settings_are_noop() {
        let raw = rect();
        let mut uvs = raw.clone();
        apply_settings(&mut uvs, &[0, 1, 2, 3], &UnwrapSettings::default());
        assert_eq!(uvs, raw);
    }

    #[test]
    fn test_fill_modes() {
        let idx = [0, 1, 2, 3];

        let mut uvs = rect();
        apply_settings(&mut uvs, &idx, &UnwrapSettings::default().with_fill(Fill::Fit));
        let size = Bounds2::from_points(&uvs).size();
        assert!((size.x - 1.0).abs() < 1e-10);
        assert!((size.y - 0.5).abs() < 1e-10);

        let mut uvs = rect();
        apply_settings(&mut uvs, &idx, &UnwrapSettings::default().with_fill(Fill::Stretch));
        let size = Bounds2::from_points(&uvs).size();
        assert!((size - Vector2::new(1.0, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn test_transform_about_center() {
        let mut uvs = rect();
        let settings = UnwrapSettings::default()
            .with_scale(Vector2::new(0.5, 0.5))
            .with_rotation(90.0);
        apply_settings(&mut uvs, &[0, 1, 2, 3], &settings);

        let b = Bounds2::from_points(&uvs);
        assert!((b.center() - Point2::new(3.0, 2.0)).norm() < 1e-10);
        // 4x2 scaled to 2x1, then turned a quarter.
        assert!((b.size() - Vector2::new(1.0, 2.0)).norm() < 1e-10);
    }

    #[test]
    fn test_rotation_keeps_triangle_bounds_centered() {
        let mut uvs = vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(0.0, 1.0)];
        let settings = UnwrapSettings::default()
            .with_scale(Vector2::new(1.5, 0.5))
            .with_rotation(45.0);
        apply_settings(&mut uvs, &[0, 1, 2], &settings);

        let b = Bounds2::from_points(&uvs);
        assert!((b.center() - Point2::new(1.0, 0.5)).norm() < 1e-10);
        // Shape is preserved: the long edge is scaled by 1.5 only.
        assert!(((uvs[1] - uvs[0]).norm() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_anchors() {
        let idx = [0, 1, 2, 3];

        let mut uvs = rect();
        apply_settings(&mut uvs, &idx, &UnwrapSettings::default().with_anchor(Some(Anchor::LowerLeft)));
        assert!((Bounds2::from_points(&uvs).min - Point2::origin()).norm() < 1e-10);

        let mut uvs = rect();
        apply_settings(&mut uvs, &idx, &UnwrapSettings::default().with_anchor(Some(Anchor::UpperRight)));
        assert!((Bounds2::from_points(&uvs).max - Point2::new(1.0, 1.0)).norm() < 1e-10);

        let mut uvs = rect();
        apply_settings(&mut uvs, &idx, &UnwrapSettings::default().with_anchor(Some(Anchor::MiddleCenter)));
        assert!((Bounds2::from_points(&uvs).center() - Point2::new(0.5, 0.5)).norm() < 1e-10);

        // World space ignores the anchor.
        let mut uvs = rect();
        let settings = UnwrapSettings::default()
            .with_anchor(Some(Anchor::LowerLeft))
            .with_world_space(true);
        apply_settings(&mut uvs, &idx, &settings);
        assert_eq!(uvs, rect());
    }

    #[test]
    fn test_flip_swap_offset() {
        let mut uvs = vec![Point2::new(1.0, 2.0)];
        let settings = UnwrapSettings::default()
            .with_flip_u(true)
            .with_swap_uv(true)
            .with_offset(Vector2::new(0.5, 0.5));
        apply_settings(&mut uvs, &[0], &settings);
        assert_eq!(uvs[0], Point2::new(1.5, -1.5));
    }

    #[test]
    fn test_offset_applies_after_anchor() {
        let mut uvs = rect();
        let settings = UnwrapSettings::default()
            .with_anchor(Some(Anchor::LowerLeft))
            .with_offset(Vector2::new(-0.25, 0.0));
        apply_settings(&mut uvs, &[0, 1, 2, 3], &settings);
        assert!((Bounds2::from_points(&uvs).min - Point2::new(0.25, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_unwrap_writes_raw_projection() {
        let mut mesh = build_grid(1).unwrap();
        let f = FaceId::new(0);
        unwrap(&mut mesh, f);

        let expected = project_face(&mesh, f);
        assert_eq!(face_uvs(&mesh, f), expected);
        assert!((expected[1] - Point2::new(-1.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_world_space_projection() {
        let mut mesh = build_grid(1).unwrap();
        let f = FaceId::new(0);
        mesh.set_transform(Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)));
        mesh.face_mut(f).uv.use_world_space = true;
        unwrap(&mut mesh, f);

        let uvs = face_uvs(&mesh, f);
        assert!((uvs[0] - Point2::new(-10.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_round_trip_through_stored_transform() {
        let mut mesh = build_grid(1).unwrap();
        let f = FaceId::new(0);
        mesh.face_mut(f).uv = UnwrapSettings::default()
            .with_rotation(30.0)
            .with_scale(Vector2::new(2.0, 0.5))
            .with_offset(Vector2::new(0.3, -0.2));
        unwrap(&mut mesh, f);
        let before = face_uvs(&mesh, f);

        let t = get_uv_transform(&mesh, f);
        assert!((t.rotation - 30.0).abs() < 1e-8);
        assert!((t.scale - Vector2::new(2.0, 0.5)).norm() < 1e-8);
        assert!((t.translation - Vector2::new(-0.3, 0.2)).norm() < 1e-8);

        set_auto_and_align_unwrap_params_to_uvs(&mut mesh, &[f]);
        let after = face_uvs(&mesh, f);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).norm() < 1e-8);
        }
        assert!(!mesh.face(f).manual_uv);
    }

    #[test]
    fn test_round_trip_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.5, 1.5, 0.0),
        ];
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let f = FaceId::new(0);
        mesh.face_mut(f).uv = UnwrapSettings::default()
            .with_rotation(30.0)
            .with_scale(Vector2::new(2.0, 0.5))
            .with_offset(Vector2::new(0.3, -0.2));
        unwrap(&mut mesh, f);
        let before = face_uvs(&mesh, f);

        let t = get_uv_transform(&mesh, f);
        assert!((t.rotation - 30.0).abs() < 1e-8);
        assert!((t.scale - Vector2::new(2.0, 0.5)).norm() < 1e-8);
        assert!((t.translation - Vector2::new(-0.3, 0.2)).norm() < 1e-8);

        set_auto_and_align_unwrap_params_to_uvs(&mut mesh, &[f]);
        let drift: f64 = before
            .iter()
            .zip(face_uvs(&mesh, f).iter())
            .map(|(a, b)| (a - b).norm())
            .sum();
        assert!(drift < 1e-8, "drift {}", drift);
    }

    #[test]
    fn test_texture_group_projects_as_one() {
        let mut mesh = build_grid(2).unwrap();
        let (a, b) = (FaceId::new(0), FaceId::new(1));
        for f in [a, b] {
            mesh.face_mut(f).uv.anchor = Some(Anchor::LowerLeft);
        }

        refresh_uv(&mut mesh, &[a, b]);
        // Anchored separately, the shared corner lands in different places.
        assert!((mesh.textures()[1] - mesh.textures()[4]).norm() > 0.5);

        let group = group_faces(&mut mesh, &[a, b]).unwrap();
        assert_eq!(mesh.faces_in_texture_group(group), vec![a, b]);
        assert!((mesh.textures()[1] - mesh.textures()[4]).norm() < 1e-10);
        assert!((mesh.textures()[2] - mesh.textures()[7]).norm() < 1e-10);

        ungroup_faces(&mut mesh, &[a, b]);
        assert_eq!(mesh.face(a).texture_group, None);
        assert!((mesh.textures()[1] - mesh.textures()[4]).norm() > 0.5);
    }

    #[test]
    fn test_apply_unwrap_settings_to_group() {
        let mut mesh = build_grid(2).unwrap();
        let group = group_faces(&mut mesh, &[FaceId::new(0), FaceId::new(1)]).unwrap();
        let settings = UnwrapSettings::default().with_fill(Fill::Stretch);
        apply_unwrap_settings(&mut mesh, UnwrapTarget::TextureGroup(group), settings);

        assert_eq!(mesh.face(FaceId::new(1)).uv.fill, Fill::Stretch);
        let indices = mesh.distinct_indices_of(&[FaceId::new(0), FaceId::new(1)]);
        let size = Bounds2::from_indexed(mesh.textures(), &indices).size();
        assert!((size - Vector2::new(1.0, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn test_refresh_skips_manual_faces() {
        let mut mesh = build_cube(1.0).unwrap();
        let f = FaceId::new(0);
        mesh.uvs_mut(UvChannel::Uv0)[0] = Point2::new(42.0, 42.0);
        mesh.face_mut(f).manual_uv = true;
        refresh_all(&mut mesh);
        assert_eq!(mesh.textures()[0], Point2::new(42.0, 42.0));
    }

    #[test]
    fn test_refresh_resets_out_of_sync_channel() {
        let mut mesh = build_cube(1.0).unwrap();
        mesh.face_mut(FaceId::new(0)).manual_uv = true;
        mesh.uvs[0] = Some(vec![Point2::origin(); 3]);

        refresh_uv(&mut mesh, &[FaceId::new(1)]);
        assert_eq!(mesh.textures().len(), 24);
        assert!(mesh.faces().iter().all(|f| !f.manual_uv));
    }

    #[test]
    fn test_set_auto_uv_manual() {
        let mut mesh = build_grid(2).unwrap();
        let group = group_faces(&mut mesh, &[FaceId::new(0), FaceId::new(1)]).unwrap();
        set_auto_uv(&mut mesh, &[FaceId::new(0)], false);

        let face = mesh.face(FaceId::new(0));
        assert!(face.manual_uv);
        assert_eq!(face.texture_group, None);
        assert_eq!(mesh.faces_in_texture_group(group), vec![FaceId::new(1)]);

        set_auto_uv(&mut mesh, &[FaceId::new(0)], true);
        assert!(!mesh.face(FaceId::new(0)).manual_uv);
    }

    #[test]
    fn test_copy_uvs() {
        let mut mesh = build_grid(2).unwrap();
        refresh_all(&mut mesh);
        copy_uvs(&mut mesh, FaceId::new(0), FaceId::new(3), UvChannel::Uv0);
        assert_eq!(face_uvs(&mesh, FaceId::new(0)), face_uvs(&mesh, FaceId::new(3)));
    }
}
