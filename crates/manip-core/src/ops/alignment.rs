//! Bounding-box alignment

use super::{ManipError, ManipResult, require_selection, translate};
use crate::bounds::{aggregate, compute_bounds};
use crate::scene::SceneGraph;
use crate::selection::Selection;
use crate::types::{AlignTarget, Axis};

/// Align the selection's bounding boxes on one axis.
///
/// The min face, center or max face of every object's bounds is moved onto
/// the matching coordinate of the selection's combined bounds. Only `axis`
/// changes; objects without visual extent are left alone.
pub fn align_objects<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    axis: Axis,
    target: AlignTarget,
) -> ManipResult<usize> {
    require_selection(selection, 2)?;

    let members: Vec<_> = selection
        .iter()
        .map(|id| (id, compute_bounds(scene, id)))
        .filter(|(_, bounds)| !bounds.is_degenerate())
        .collect();

    let total = aggregate(members.iter().map(|(_, bounds)| *bounds));
    if total.is_degenerate() {
        return Err(ManipError::DegenerateGeometry);
    }

    let target_value = target.pick(&total, axis);
    let mut moved = 0;
    for (id, bounds) in members {
        let delta = target_value - target.pick(&bounds, axis);
        if translate(scene, id, axis.unit() * delta) {
            moved += 1;
        }
    }

    tracing::debug!(
        "Aligned {} object(s) to {} {}",
        moved,
        axis.name(),
        target.name()
    );
    Ok(moved)
}
