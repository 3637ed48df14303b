//! Row selection tracking.

use std::collections::HashSet;
use std::hash::Hash;

use crate::model::PostId;

/// State of a checkbox, including the header's mixed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Tracks selected rows by their keys.
///
/// Header-level queries take the currently rendered keys; selected keys that
/// are not rendered are kept but ignored by them.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash = PostId> {
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Flips selection for a key. Returns the new membership.
    pub fn toggle_row(&mut self, key: K) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Deselects every rendered key if all are selected, otherwise selects
    /// them all. Keys that are not rendered are left alone.
    pub fn toggle_all(&mut self, rendered: &[K]) {
        if self.is_all_selected(rendered) {
            for key in rendered {
                self.selected.remove(key);
            }
        } else {
            self.selected.extend(rendered.iter().cloned());
        }
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns `true` if there are rendered keys and all of them are selected.
    pub fn is_all_selected(&self, rendered: &[K]) -> bool {
        !rendered.is_empty() && rendered.iter().all(|key| self.selected.contains(key))
    }

    /// Returns `true` if at least one rendered key is selected.
    pub fn is_any_selected(&self, rendered: &[K]) -> bool {
        rendered.iter().any(|key| self.selected.contains(key))
    }

    /// Returns `true` if some, but not all, rendered keys are selected.
    pub fn is_indeterminate(&self, rendered: &[K]) -> bool {
        self.is_any_selected(rendered) && !self.is_all_selected(rendered)
    }

    /// Returns the state of the select-all checkbox.
    pub fn header_state(&self, rendered: &[K]) -> CheckState {
        if self.is_all_selected(rendered) {
            CheckState::Checked
        } else if self.is_any_selected(rendered) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Returns the selected rendered keys, in render order.
    pub fn selected_in(&self, rendered: &[K]) -> Vec<K> {
        rendered
            .iter()
            .filter(|key| self.selected.contains(key))
            .cloned()
            .collect()
    }

    /// Returns the number of selected keys, rendered or not.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get all selected keys.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PostId> {
        raw.iter().copied().map(PostId).collect()
    }

    #[test]
    fn test_toggle_parity() {
        let mut selection = Selection::new();
        let toggles = [1, 2, 1, 3, 1, 2, 2];
        for id in toggles {
            selection.toggle_row(PostId(id));
        }
        for id in 1..=3u64 {
            let count = toggles.iter().filter(|&&t| t == id).count();
            assert_eq!(selection.is_selected(&PostId(id)), count % 2 == 1, "id {}", id);
        }
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let rendered = ids(&[1, 2, 3]);
        let mut selection = Selection::new();
        selection.toggle_row(PostId(2));
        selection.toggle_row(PostId(99));

        selection.toggle_all(&rendered);
        assert!(selection.is_all_selected(&rendered));

        selection.toggle_all(&rendered);
        assert!(!selection.is_any_selected(&rendered));
        assert!(selection.is_selected(&PostId(99)));
    }

    #[test]
    fn test_toggle_all_depends_on_rendered() {
        let mut selection = Selection::new();
        selection.toggle_all(&ids(&[1, 2]));
        selection.toggle_all(&ids(&[1, 2, 3]));
        assert!(selection.is_all_selected(&ids(&[1, 2, 3])));
    }

    #[test]
    fn test_header_state() {
        let rendered = ids(&[1, 2, 3]);
        let mut selection = Selection::new();
        assert_eq!(selection.header_state(&rendered), CheckState::Unchecked);

        // Stale selections off the page do not count.
        selection.toggle_row(PostId(7));
        assert!(!selection.is_indeterminate(&rendered));

        selection.toggle_row(PostId(1));
        assert!(selection.is_indeterminate(&rendered));
        assert_eq!(selection.header_state(&rendered), CheckState::Indeterminate);

        selection.toggle_all(&rendered);
        assert_eq!(selection.header_state(&rendered), CheckState::Checked);
        assert_eq!(selection.header_state(&[]), CheckState::Unchecked);
    }

    #[test]
    fn test_selected_in_render_order() {
        let mut selection = Selection::new();
        selection.toggle_row(PostId(3));
        selection.toggle_row(PostId(1));
        selection.toggle_row(PostId(8));
        assert_eq!(selection.selected_in(&ids(&[1, 2, 3])), ids(&[1, 3]));

        assert_eq!(selection.len(), 3);

        selection.clear();
        assert!(selection.is_empty());
    }
}
