//! Live preview of transform commands.
//!
//! While a preview is active the scene shows the result of a command, but
//! the transforms each object had before the first preview are kept so the
//! scene can be put back exactly.

use std::collections::HashMap;

use manip_core::{ObjectId, SceneGraph, TransformSnapshot, WorldTransform};

/// Captured pre-preview transforms
#[derive(Debug, Default)]
pub struct PreviewSession {
    /// Transforms before the first preview touched each object
    captured: HashMap<ObjectId, WorldTransform>,
    active: bool,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or extend) a preview.
    ///
    /// Objects already captured keep their original baseline; only objects
    /// new to this session are captured. Returns how many were captured now.
    pub fn start<S: SceneGraph + ?Sized>(&mut self, scene: &S, ids: &[ObjectId]) -> usize {
        if !self.active {
            tracing::debug!("Preview started");
        }
        self.active = true;

        let mut newly = 0;
        for &id in ids {
            if self.captured.contains_key(&id) {
                continue;
            }
            match scene.world_transform(id) {
                Some(transform) => {
                    self.captured.insert(id, transform);
                    newly += 1;
                }
                None => tracing::warn!("Cannot preview stale object {}", id),
            }
        }
        newly
    }

    /// Put every captured object back to its baseline, keeping the session open.
    ///
    /// Parents are restored before their children.
    pub fn restore_baseline<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> usize {
        let mut baseline: Vec<TransformSnapshot> = self
            .captured
            .iter()
            .map(|(&id, &transform)| TransformSnapshot { id, transform })
            .collect();
        TransformSnapshot::sort_parents_first(scene, &mut baseline);

        let mut restored = 0;
        for snapshot in baseline {
            if scene.set_world_transform(snapshot.id, snapshot.transform) {
                restored += 1;
            } else {
                tracing::warn!("Preview object {} vanished, not restored", snapshot.id);
            }
        }
        restored
    }

    /// End the preview, restoring every captured object.
    ///
    /// Cancelling an idle session does nothing.
    pub fn cancel<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> usize {
        if !self.active {
            return 0;
        }

        let restored = self.restore_baseline(scene);
        self.captured.clear();
        self.active = false;
        tracing::debug!("Preview cancelled, {} object(s) restored", restored);
        restored
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Baseline transform of a captured object
    pub fn baseline(&self, id: ObjectId) -> Option<WorldTransform> {
        self.captured.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.captured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}
