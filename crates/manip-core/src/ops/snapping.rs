//! Grid, ground, bounds and stack snapping

use glam::{Quat, Vec3};

use super::{ManipError, ManipResult, require_selection, translate, write_position};
use crate::bounds::{Bounds, compute_bounds};
use crate::scene::{Raycaster, SceneGraph};
use crate::selection::Selection;
use crate::types::{Axis, ObjectId, SnapDirection, euler_degrees_to_quat, quat_to_euler_degrees};

/// Round every position component to the nearest multiple of `grid`.
///
/// Halfway values round away from zero.
pub fn snap_to_grid<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    grid: f32,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;
    if !(grid > 0.0) || !grid.is_finite() {
        return Err(ManipError::InvalidParameter(format!(
            "grid size must be positive, got {grid}"
        )));
    }

    let mut written = 0;
    for id in selection {
        let Some(position) = scene.position(id) else {
            tracing::warn!("Skipping stale object {}", id);
            continue;
        };
        if write_position(scene, id, snap_vec(position, grid)) {
            written += 1;
        }
    }
    Ok(written)
}

fn snap_vec(v: Vec3, grid: f32) -> Vec3 {
    (v / grid).round() * grid
}

/// Downward ray used to find the ground under an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// How far above the pivot the ray starts
    pub ray_height: f32,
    pub max_distance: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            ray_height: 100.0,
            max_distance: 200.0,
        }
    }
}

/// Drop each object so the bottom of its bounds rests on whatever is below.
///
/// Objects with nothing underneath have their bottom placed at height 0.
/// With `align_to_normal`, objects are also tilted so their up axis follows
/// the surface normal while keeping their original yaw.
pub fn snap_to_ground<S: SceneGraph + Raycaster + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    align_to_normal: bool,
    probe: GroundProbe,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;

    let mut written = 0;
    for id in selection {
        let Some(transform) = scene.world_transform(id) else {
            tracing::warn!("Skipping stale object {}", id);
            continue;
        };
        let position = transform.position;
        let bounds = compute_bounds(scene, id);
        let bottom = if bounds.is_degenerate() {
            position.y
        } else {
            bounds.min().y
        };
        let pivot_offset = position.y - bottom;

        let origin = position + Vec3::Y * probe.ray_height;
        let hit = scene.cast_downward(origin, probe.max_distance, id);

        let mut updated = transform;
        match hit {
            Some(hit) => {
                updated.position.y = hit.point.y + pivot_offset;
                if align_to_normal {
                    updated.rotation = align_up_keep_yaw(transform.rotation, hit.normal);
                }
            }
            None => {
                tracing::debug!("No ground below {}, snapping to height 0", id);
                updated.position.y = pivot_offset;
            }
        }

        if scene.set_world_transform(id, updated) {
            written += 1;
        }
    }
    Ok(written)
}

/// Tilt `rotation` so its up axis follows `normal`, then restore the original yaw
fn align_up_keep_yaw(rotation: Quat, normal: Vec3) -> Quat {
    let normal = normal.try_normalize().unwrap_or(Vec3::Y);
    let yaw = quat_to_euler_degrees(rotation).y;

    let tilted = Quat::from_rotation_arc(Vec3::Y, normal) * rotation;
    let mut euler = quat_to_euler_degrees(tilted.normalize());
    euler.y = yaw;
    euler_degrees_to_quat(euler)
}

/// Push every other member against a face of the first member's bounds.
///
/// Each object moves along the direction's axis only, until its opposing
/// face touches the reference.
pub fn snap_to_bounds<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    direction: SnapDirection,
) -> ManipResult<usize> {
    require_selection(selection, 2)?;
    let reference = reference_bounds(scene, selection)?;
    let axis = direction.axis();

    let targets = extent_bounds(scene, selection.rest());
    let mut moved = 0;
    for (id, bounds) in targets {
        let half = axis.component(bounds.extents());
        let target_center = if direction.is_positive() {
            axis.component(reference.max()) + half
        } else {
            axis.component(reference.min()) - half
        };
        let delta = target_center - axis.component(bounds.center());
        if translate(scene, id, axis.unit() * delta) {
            moved += 1;
        }
    }

    tracing::debug!("Snapped {} object(s) {}", moved, direction.name());
    Ok(moved)
}

/// Stack members on top of the first one, in selection order.
///
/// Only heights change. `padding` is the vertical gap left between
/// neighbours and may not be negative.
pub fn stack_objects<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    padding: f32,
) -> ManipResult<usize> {
    require_selection(selection, 2)?;
    if !(padding >= 0.0) || !padding.is_finite() {
        return Err(ManipError::InvalidParameter(format!(
            "stack padding must be zero or positive, got {padding}"
        )));
    }
    let base = reference_bounds(scene, selection)?;

    let members = extent_bounds(scene, selection.rest());
    let half_heights: Vec<f32> = members.iter().map(|(_, b)| b.extents().y).collect();
    let centers = stack_layout(base.max().y, padding, &half_heights);

    let mut moved = 0;
    for ((id, bounds), center) in members.into_iter().zip(centers) {
        let delta = center - bounds.center().y;
        if translate(scene, id, Axis::Y.unit() * delta) {
            moved += 1;
        }
    }

    tracing::debug!("Stacked {} object(s)", moved);
    Ok(moved)
}

/// Center heights for a stack resting on `base_top`.
///
/// Each entry sits `padding` above the top of the previous one.
pub fn stack_layout(base_top: f32, padding: f32, half_heights: &[f32]) -> Vec<f32> {
    let mut cursor = base_top;
    half_heights
        .iter()
        .map(|half| {
            let center = cursor + padding + half;
            cursor = center + half;
            center
        })
        .collect()
}

/// Bounds of the first member, which must have visual extent
fn reference_bounds<S: SceneGraph + ?Sized>(
    scene: &S,
    selection: &Selection,
) -> ManipResult<Bounds> {
    let first = selection.first().ok_or(ManipError::InsufficientSelection {
        required: 1,
        actual: 0,
    })?;
    let bounds = compute_bounds(scene, first);
    if bounds.is_degenerate() {
        return Err(ManipError::DegenerateGeometry);
    }
    Ok(bounds)
}

/// Bounds of each object that has visual extent, in order
fn extent_bounds<S: SceneGraph + ?Sized>(scene: &S, ids: &[ObjectId]) -> Vec<(ObjectId, Bounds)> {
    ids.iter()
        .filter_map(|&id| {
            let bounds = compute_bounds(scene, id);
            if bounds.is_degenerate() {
                tracing::debug!("Skipping {} without visual extent", id);
                None
            } else {
                Some((id, bounds))
            }
        })
        .collect()
}
