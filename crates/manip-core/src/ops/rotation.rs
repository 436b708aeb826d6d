//! Absolute, additive and random rotation

use glam::Vec3;
use rand::Rng;

use super::{ManipResult, require_selection};
use crate::scene::SceneGraph;
use crate::selection::Selection;
use crate::types::{ObjectId, euler_degrees_to_quat};

fn write_rotation<S: SceneGraph + ?Sized>(scene: &mut S, id: ObjectId, rotation: glam::Quat) -> bool {
    let written = scene.set_rotation(id, rotation);
    if !written {
        tracing::warn!("Skipping stale object {}", id);
    }
    written
}

/// Set the same absolute world rotation (Euler degrees) on every object
pub fn set_rotation<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    euler_degrees: Vec3,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;
    let rotation = euler_degrees_to_quat(euler_degrees);
    Ok(selection
        .iter()
        .filter(|&id| write_rotation(scene, id, rotation))
        .count())
}

pub fn reset_rotation<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
) -> ManipResult<usize> {
    set_rotation(scene, selection, Vec3::ZERO)
}

/// Rotate every object about the world axes by `euler_delta` degrees.
///
/// The delta is applied after the current orientation (`delta * current`).
pub fn add_rotation<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    euler_delta: Vec3,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;
    let delta = euler_degrees_to_quat(euler_delta);

    let mut written = 0;
    for id in selection {
        let Some(current) = scene.rotation(id) else {
            tracing::warn!("Skipping stale object {}", id);
            continue;
        };
        if write_rotation(scene, id, (delta * current).normalize()) {
            written += 1;
        }
    }
    Ok(written)
}

/// Give every object an independent random absolute rotation.
///
/// Each axis is drawn uniformly from `[min, max]` (degrees).
pub fn randomize_rotation<S: SceneGraph + ?Sized, R: Rng>(
    scene: &mut S,
    selection: &Selection,
    min_euler: Vec3,
    max_euler: Vec3,
    rng: &mut R,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;
    let (lo, hi) = (min_euler.min(max_euler), min_euler.max(max_euler));

    let mut written = 0;
    for id in selection {
        let euler = Vec3::new(
            sample(rng, lo.x, hi.x),
            sample(rng, lo.y, hi.y),
            sample(rng, lo.z, hi.z),
        );
        if write_rotation(scene, id, euler_degrees_to_quat(euler)) {
            written += 1;
        }
    }
    Ok(written)
}

/// Uniform sample in `[lo, hi]`; a collapsed range yields `lo`.
///
/// Spans too wide for `gen_range` (which panics once `hi - lo` nears
/// `f32::MAX`) are interpolated between the endpoints instead.
pub(crate) fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    let span = hi - lo;
    if span.is_finite() && span < f32::MAX * 0.5 {
        rng.gen_range(lo..=hi)
    } else {
        let t: f32 = rng.gen_range(0.0..=1.0);
        (lo * (1.0 - t) + hi * t).max(lo).min(hi)
    }
}
