//! Absolute positioning

use glam::Vec3;

use super::{ManipResult, require_selection, translate, write_position};
use crate::scene::SceneGraph;
use crate::selection::Selection;

/// Move every selected object to `position`
pub fn set_position<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    position: Vec3,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;
    Ok(selection
        .iter()
        .filter(|&id| write_position(scene, id, position))
        .count())
}

/// Translate the group rigidly so the centroid of its pivots lands on the origin
pub fn center_objects<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
) -> ManipResult<usize> {
    require_selection(selection, 1)?;

    let positions: Vec<Vec3> = selection.iter().filter_map(|id| scene.position(id)).collect();
    if positions.is_empty() {
        return Ok(0);
    }
    let centroid = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
    let offset = Vec3::ZERO - centroid;

    Ok(selection
        .iter()
        .filter(|&id| translate(scene, id, offset))
        .count())
}

/// Collapse every selected object onto the world origin
pub fn move_to_origin<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
) -> ManipResult<usize> {
    set_position(scene, selection, Vec3::ZERO)
}
