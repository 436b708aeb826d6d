//! Host scene capabilities.
//!
//! The manipulator never owns scene objects. Everything it needs from the
//! host is expressed through the traits in this module:
//!
//! - [`SceneGraph`] - read/write world transforms, enumerate visual bounds
//! - [`Raycaster`] - downward ray queries for snap-to-ground
//! - [`SceneHierarchy`] - duplicate, destroy, create and reparent objects
//! - [`UndoRecorder`] - history recording before committed mutations
//!
//! [`MemoryScene`] implements the scene traits for tests and for hosts
//! without a scene graph of their own.

mod memory;

pub use memory::*;

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::bounds::Bounds;
use crate::types::{ObjectId, WorldTransform};

/// Errors from hierarchy operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Reparenting would create a cycle")]
    WouldCreateCycle,
}

/// Transform access and visual bounds of scene objects
pub trait SceneGraph {
    /// World transform of an object, `None` if the handle is stale
    fn world_transform(&self, id: ObjectId) -> Option<WorldTransform>;

    /// Overwrite the world transform. Returns false if the handle is stale.
    fn set_world_transform(&mut self, id: ObjectId, transform: WorldTransform) -> bool;

    /// World-space bounds of every visual sub-part (including children)
    fn visual_bounds(&self, id: ObjectId) -> Vec<Bounds>;

    /// Parent of an object. Hosts with a flat scene keep the default.
    fn parent(&self, _id: ObjectId) -> Option<ObjectId> {
        None
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.world_transform(id).is_some()
    }

    fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.world_transform(id).map(|t| t.position)
    }

    fn rotation(&self, id: ObjectId) -> Option<Quat> {
        self.world_transform(id).map(|t| t.rotation)
    }

    fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.world_transform(id) {
            Some(transform) => self.set_world_transform(id, WorldTransform { position, ..transform }),
            None => false,
        }
    }

    fn set_rotation(&mut self, id: ObjectId, rotation: Quat) -> bool {
        match self.world_transform(id) {
            Some(transform) => self.set_world_transform(id, WorldTransform { rotation, ..transform }),
            None => false,
        }
    }
}

/// Result of a successful ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Unit surface normal at the hit point
    pub normal: Vec3,
    pub distance: f32,
    /// Object that was hit, `None` for scene-level surfaces
    pub object: Option<ObjectId>,
}

/// Ray queries against world geometry
pub trait Raycaster {
    /// Cast straight down from `origin`. Geometry belonging to `exclude`
    /// (and its children) must never be reported.
    fn cast_downward(&self, origin: Vec3, max_distance: f32, exclude: ObjectId) -> Option<RayHit>;
}

/// Structural edits of the scene hierarchy
pub trait SceneHierarchy {
    fn name(&self, id: ObjectId) -> Option<String>;

    /// Clone an object (and its children) under a new name
    fn duplicate(&mut self, id: ObjectId, name: &str) -> Result<ObjectId, SceneError>;

    /// Destroy an object and all of its descendants
    fn destroy(&mut self, id: ObjectId) -> Result<(), SceneError>;

    /// Create an object with no visual parts
    fn create_empty(&mut self, name: &str, transform: WorldTransform) -> ObjectId;

    /// Reparent keeping the world transform. `None` moves to the scene root.
    fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> Result<(), SceneError>;
}

/// Everything the manipulator engine needs from a host scene
pub trait SceneHost: SceneGraph + Raycaster + SceneHierarchy {}

impl<T: SceneGraph + Raycaster + SceneHierarchy + ?Sized> SceneHost for T {}

/// A transform captured before a mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    pub id: ObjectId,
    pub transform: WorldTransform,
}

impl TransformSnapshot {
    /// Capture the current transforms of every live object in `ids`
    pub fn capture<S: SceneGraph + ?Sized>(scene: &S, ids: &[ObjectId]) -> Vec<TransformSnapshot> {
        ids.iter()
            .filter_map(|&id| {
                scene
                    .world_transform(id)
                    .map(|transform| TransformSnapshot { id, transform })
            })
            .collect()
    }

    /// Order snapshots so every ancestor comes before its descendants.
    ///
    /// Writing a parent carries its children along, so restoring in this
    /// order leaves each object at its recorded transform.
    pub fn sort_parents_first<S: SceneGraph + ?Sized>(scene: &S, snapshots: &mut [TransformSnapshot]) {
        snapshots.sort_by_cached_key(|s| hierarchy_depth(scene, s.id));
    }
}

/// Number of ancestors above an object. The hierarchy must be acyclic.
pub fn hierarchy_depth<S: SceneGraph + ?Sized>(scene: &S, id: ObjectId) -> usize {
    let mut depth = 0;
    let mut current = scene.parent(id);
    while let Some(parent) = current {
        depth += 1;
        current = scene.parent(parent);
    }
    depth
}

/// Undo/history recording, implemented by the host
pub trait UndoRecorder {
    /// Called once per commit, before any transform is written
    fn record_before_mutation(&mut self, before: &[TransformSnapshot], label: &str);

    /// Called after an object has been created by a commit
    fn register_creation(&mut self, id: ObjectId, label: &str);

    /// Called before an object is destroyed by a commit
    fn record_before_destroy(&mut self, id: ObjectId, label: &str);
}
