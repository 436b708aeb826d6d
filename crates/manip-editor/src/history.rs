//! Undo/Redo history for committed transform changes

use manip_core::{ObjectId, SceneGraph, TransformSnapshot, UndoRecorder};

/// Transforms recorded before a committed command
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub before: Vec<TransformSnapshot>,
    /// Label of the command that led to this entry
    pub label: String,
}

/// In-memory undo recorder.
///
/// Transform changes can be undone and redone against any [`SceneGraph`].
/// Creations and destructions are only logged; restoring destroyed objects
/// needs the host's own serialization.
#[derive(Debug)]
pub struct MemoryHistory {
    /// Stack of states that can be undone
    undo_stack: Vec<HistoryEntry>,
    /// Stack of states that can be redone
    redo_stack: Vec<HistoryEntry>,
    /// Maximum number of history entries, also the length of each log
    max_history: usize,
    created: Vec<(ObjectId, String)>,
    destroyed: Vec<(ObjectId, String)>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl MemoryHistory {
    /// Create a new history with the specified maximum entries
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
            created: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    /// Undo the last entry, returning its label.
    ///
    /// The current transforms of the same objects are pushed to the redo stack.
    pub fn undo<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(swap_in(scene, &entry));
        tracing::debug!("Undo: {}", entry.label);
        Some(entry.label)
    }

    /// Redo the last undone entry, returning its label
    pub fn redo<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Option<String> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(swap_in(scene, &entry));
        tracing::debug!("Redo: {}", entry.label);
        Some(entry.label)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Most recent undoable entry
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Most recent objects registered as created, with their labels
    pub fn created(&self) -> &[(ObjectId, String)] {
        &self.created
    }

    /// Most recent objects recorded before destruction, with their labels
    pub fn destroyed(&self) -> &[(ObjectId, String)] {
        &self.destroyed
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.created.clear();
        self.destroyed.clear();
    }
}

/// Drop the oldest items so at most `max` remain
fn trim_front<T>(items: &mut Vec<T>, max: usize) {
    if items.len() > max {
        items.drain(..items.len() - max);
    }
}

/// Apply an entry's transforms, returning an entry with the replaced values
fn swap_in<S: SceneGraph + ?Sized>(scene: &mut S, entry: &HistoryEntry) -> HistoryEntry {
    let ids: Vec<ObjectId> = entry.before.iter().map(|s| s.id).collect();
    let current = TransformSnapshot::capture(scene, &ids);

    let mut restore = entry.before.clone();
    TransformSnapshot::sort_parents_first(scene, &mut restore);
    for snapshot in &restore {
        if !scene.set_world_transform(snapshot.id, snapshot.transform) {
            tracing::warn!("History object {} no longer exists", snapshot.id);
        }
    }

    HistoryEntry {
        before: current,
        label: entry.label.clone(),
    }
}

impl UndoRecorder for MemoryHistory {
    fn record_before_mutation(&mut self, before: &[TransformSnapshot], label: &str) {
        // Clear redo stack when a new action is performed
        self.redo_stack.clear();

        self.undo_stack.push(HistoryEntry {
            before: before.to_vec(),
            label: label.to_string(),
        });

        // Trim history if it exceeds the maximum
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    fn register_creation(&mut self, id: ObjectId, label: &str) {
        tracing::debug!("{}: created {}", label, id);
        self.created.push((id, label.to_string()));
        trim_front(&mut self.created, self.max_history);
    }

    fn record_before_destroy(&mut self, id: ObjectId, label: &str) {
        tracing::debug!("{}: destroying {}", label, id);
        self.destroyed.push((id, label.to_string()));
        trim_front(&mut self.destroyed, self.max_history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use manip_core::MemoryScene;

    fn record_move(history: &mut MemoryHistory, scene: &mut MemoryScene, id: ObjectId, to: Vec3) {
        let before = TransformSnapshot::capture(scene, &[id]);
        history.record_before_mutation(&before, "Set Position");
        scene.set_position(id, to);
    }

    #[test]
    fn test_undo_redo() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::ZERO, Vec3::ONE);
        let mut history = MemoryHistory::default();

        record_move(&mut history, &mut scene, a, Vec3::X);
        record_move(&mut history, &mut scene, a, Vec3::Y);

        assert_eq!(history.undo(&mut scene).as_deref(), Some("Set Position"));
        assert_eq!(scene.position(a), Some(Vec3::X));
        history.undo(&mut scene);
        assert_eq!(scene.position(a), Some(Vec3::ZERO));
        assert!(!history.can_undo());
        assert!(history.undo(&mut scene).is_none());

        history.redo(&mut scene);
        assert_eq!(scene.position(a), Some(Vec3::X));
        history.redo(&mut scene);
        assert_eq!(scene.position(a), Some(Vec3::Y));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::ZERO, Vec3::ONE);
        let mut history = MemoryHistory::default();

        record_move(&mut history, &mut scene, a, Vec3::X);
        history.undo(&mut scene);
        assert!(history.can_redo());

        record_move(&mut history, &mut scene, a, Vec3::Z);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::ZERO, Vec3::ONE);
        let mut history = MemoryHistory::new(3);

        for i in 0..5 {
            record_move(&mut history, &mut scene, a, Vec3::splat(i as f32 + 1.0));
        }
        assert_eq!(history.len(), 3);

        while history.undo(&mut scene).is_some() {}
        // The two oldest entries were dropped
        assert_eq!(scene.position(a), Some(Vec3::splat(2.0)));
    }

    #[test]
    fn test_creation_and_destruction_log() {
        let mut history = MemoryHistory::default();
        let id = ObjectId::new();
        history.register_creation(id, "Group Objects");
        history.record_before_destroy(id, "Delete Objects");

        assert_eq!(history.created(), &[(id, "Group Objects".to_string())]);
        assert_eq!(history.destroyed().len(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_logs_are_bounded() {
        let mut history = MemoryHistory::new(2);
        let ids: Vec<ObjectId> = (0..4).map(|_| ObjectId::new()).collect();
        for &id in &ids {
            history.register_creation(id, "Duplicate Objects");
            history.record_before_destroy(id, "Delete Objects");
        }

        let created: Vec<ObjectId> = history.created().iter().map(|(id, _)| *id).collect();
        assert_eq!(created, ids[2..]);
        assert_eq!(history.destroyed().len(), 2);
    }
}
