//! Duplicate, delete and group.
//!
//! These change the scene hierarchy rather than transforms, so they report
//! to the recorder through creation/destruction hooks and hand back the
//! selection the host should switch to.

use glam::Vec3;

use super::{ManipResult, require_selection};
use crate::scene::{SceneGraph, SceneHierarchy, TransformSnapshot, UndoRecorder};
use crate::selection::Selection;
use crate::types::{ObjectId, WorldTransform};

pub const DUPLICATE_LABEL: &str = "Duplicate Objects";
pub const DELETE_LABEL: &str = "Delete Objects";
pub const GROUP_LABEL: &str = "Group Objects";

/// Name given to the parent created by [`group`]
pub const GROUP_NAME: &str = "Group";

/// Clone every selected object. Returns the clones, in selection order.
pub fn duplicate<S, R>(scene: &mut S, recorder: &mut R, selection: &Selection) -> ManipResult<Selection>
where
    S: SceneGraph + SceneHierarchy + ?Sized,
    R: UndoRecorder + ?Sized,
{
    require_selection(selection, 1)?;

    let mut clones = Vec::with_capacity(selection.len());
    for id in selection {
        let Some(name) = scene.name(id) else {
            tracing::warn!("Skipping stale object {}", id);
            continue;
        };
        match scene.duplicate(id, &format!("{name} (Clone)")) {
            Ok(clone) => {
                recorder.register_creation(clone, DUPLICATE_LABEL);
                clones.push(clone);
            }
            Err(e) => tracing::warn!("Failed to duplicate {}: {}", id, e),
        }
    }

    tracing::info!("Duplicated {} object(s)", clones.len());
    Ok(Selection::from_ids(clones))
}

/// Destroy every selected object and its descendants
pub fn delete<S, R>(scene: &mut S, recorder: &mut R, selection: &Selection) -> ManipResult<usize>
where
    S: SceneGraph + SceneHierarchy + ?Sized,
    R: UndoRecorder + ?Sized,
{
    require_selection(selection, 1)?;

    let mut removed = 0;
    for id in selection {
        // Children selected alongside a parent are already gone
        if !scene.contains(id) {
            tracing::debug!("Object {} already removed", id);
            continue;
        }
        recorder.record_before_destroy(id, DELETE_LABEL);
        match scene.destroy(id) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to delete {}: {}", id, e),
        }
    }

    tracing::info!("Deleted {} object(s)", removed);
    Ok(removed)
}

/// Parent the selection under a new empty object at the centroid of their pivots.
///
/// The members' transforms are recorded before they are reparented, then
/// the new parent is registered as created.
pub fn group<S, R>(scene: &mut S, recorder: &mut R, selection: &Selection) -> ManipResult<ObjectId>
where
    S: SceneGraph + SceneHierarchy + ?Sized,
    R: UndoRecorder + ?Sized,
{
    require_selection(selection, 2)?;

    let positions: Vec<Vec3> = selection.iter().filter_map(|id| scene.position(id)).collect();
    let center = if positions.is_empty() {
        Vec3::ZERO
    } else {
        positions.iter().copied().sum::<Vec3>() / positions.len() as f32
    };

    recorder.record_before_mutation(
        &TransformSnapshot::capture(scene, selection.as_slice()),
        GROUP_LABEL,
    );
    let parent = scene.create_empty(GROUP_NAME, WorldTransform::from_position(center));
    recorder.register_creation(parent, GROUP_LABEL);

    for id in selection {
        if let Err(e) = scene.set_parent(id, Some(parent)) {
            tracing::warn!("Failed to reparent {} under group: {}", id, e);
        }
    }

    tracing::info!("Grouped {} object(s) under {}", selection.len(), parent);
    Ok(parent)
}
