//! Ordered object selections

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// Ordered, duplicate-free sequence of selected objects.
///
/// Order matters: the first member is the anchor for arrangement and the
/// reference for alignment, stacking and snap-to-bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered list, keeping the first occurrence of duplicates
    pub fn from_ids(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { ids }
    }

    pub fn single(id: ObjectId) -> Self {
        Self { ids: vec![id] }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The first selected object, used as anchor/reference
    pub fn first(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<ObjectId> {
        self.ids.get(index).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    /// Every member except the first
    pub fn rest(&self) -> &[ObjectId] {
        self.ids.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.ids
    }
}

impl FromIterator<ObjectId> for Selection {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = ObjectId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ObjectId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

/// Source of the current selection, owned by the host
pub trait SelectionProvider {
    fn current_selection(&self) -> Selection;
}

/// Simple selection holder with change tracking
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selection: Selection,
    revision: u64,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Returns true if it actually changed.
    pub fn set(&mut self, selection: Selection) -> bool {
        if self.selection == selection {
            return false;
        }
        self.selection = selection;
        self.revision += 1;
        true
    }

    /// Clear the selection. Returns true if it was not already empty.
    pub fn clear(&mut self) -> bool {
        self.set(Selection::new())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Incremented on every change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl SelectionProvider for SelectionManager {
    fn current_selection(&self) -> Selection {
        self.selection.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_dedup_keeps_order() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let c = ObjectId::new();

        let selection = Selection::from_ids([b, a, b, c, a]);
        assert_eq!(selection.as_slice(), &[b, a, c]);
        assert_eq!(selection.first(), Some(b));
        assert_eq!(selection.rest(), &[a, c]);
    }

    #[test]
    fn test_empty_selection_rest() {
        let selection = Selection::new();
        assert!(selection.rest().is_empty());
        assert_eq!(selection.first(), None);
    }

    #[test]
    fn test_manager_tracks_changes() {
        let mut manager = SelectionManager::new();
        let id = ObjectId::new();

        assert!(manager.set(Selection::single(id)));
        assert!(!manager.set(Selection::single(id)));
        assert_eq!(manager.revision(), 1);

        assert!(manager.clear());
        assert!(!manager.clear());
        assert_eq!(manager.revision(), 2);
        assert!(manager.current_selection().is_empty());
    }
}
