//! Transform operations on selections.
//!
//! Every operation validates its preconditions up front. A violated
//! precondition returns an error *before anything is written*, so callers
//! can treat every [`ManipError`] as a silent no-op. On success the number
//! of objects that were written is returned.

mod alignment;
mod arrangement;
mod positioning;
mod rotation;
mod snapping;
mod utility;

pub use alignment::*;
pub use arrangement::*;
pub use positioning::*;
pub use rotation::*;
pub use snapping::*;
pub use utility::*;

use glam::Vec3;
use thiserror::Error;

use crate::scene::SceneGraph;
use crate::selection::Selection;
use crate::types::ObjectId;

/// Reasons an operation did nothing. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManipError {
    #[error("Selection has {actual} object(s), at least {required} required")]
    InsufficientSelection { required: usize, actual: usize },

    #[error("No participating object has visual extent")]
    DegenerateGeometry,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0} cannot be previewed")]
    NotPreviewable(&'static str),
}

/// Result type for manipulation operations
pub type ManipResult<T> = Result<T, ManipError>;

/// Fail with `InsufficientSelection` when fewer than `required` are selected
pub fn require_selection(selection: &Selection, required: usize) -> ManipResult<()> {
    if selection.len() < required {
        return Err(ManipError::InsufficientSelection {
            required,
            actual: selection.len(),
        });
    }
    Ok(())
}

/// Write a position, logging stale handles
pub(crate) fn write_position<S: SceneGraph + ?Sized>(
    scene: &mut S,
    id: ObjectId,
    position: Vec3,
) -> bool {
    let written = scene.set_position(id, position);
    if !written {
        tracing::warn!("Skipping stale object {}", id);
    }
    written
}

/// Move an object by `offset`, logging stale handles
pub(crate) fn translate<S: SceneGraph + ?Sized>(scene: &mut S, id: ObjectId, offset: Vec3) -> bool {
    match scene.position(id) {
        Some(position) => write_position(scene, id, position + offset),
        None => {
            tracing::warn!("Skipping stale object {}", id);
            false
        }
    }
}
