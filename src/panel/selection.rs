use super::PanelState;
use crate::Entry;

impl PanelState {
    /// Flips the tag on `index`; out-of-range indices are ignored.
    /// Returns whether `index` is selected afterwards.
    ///
    /// `..` can be tagged like any row. It is dropped later by `resolve_operands()`.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        if self.selected_indices.remove(&index) {
            false
        } else {
            self.selected_indices.insert(index)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_indices.clear();
    }

    /// Drops every tag and focuses `index`.
    pub fn replace_with_single(&mut self, index: usize) {
        self.cancel_search();
        self.selected_indices.clear();
        self.set_focus(index);
    }

    /// Pointer activation of row `index`.
    ///
    /// With the toggle modifier held the row's tag flips and focus follows;
    /// a plain click focuses the row and clears the selection.
    pub fn click(&mut self, index: usize, modifier: bool) {
        if modifier {
            self.cancel_search();
            self.toggle(index);
            self.set_focus(index);
        } else {
            self.replace_with_single(index);
        }
    }

    /// Insert-key behaviour: tag the focused row and step to the next one.
    pub fn toggle_focused_and_advance(&mut self) {
        self.toggle(self.focused_index);
        self.move_down();
    }

    /// Entries a batch command acts on.
    ///
    /// The selection in ascending index order if there is one, otherwise the focused
    /// entry alone. `..` is filtered out either way, so the result may be empty.
    pub fn resolve_operands(&self) -> Vec<Entry> {
        let operands: Vec<&Entry> = if self.selected_indices.is_empty() {
            vec![self.focused_entry()]
        } else {
            self.selected_indices
                .iter()
                .filter_map(|&i| self.entries.get(i))
                .collect()
        };

        operands
            .into_iter()
            .filter(|e| !e.is_parent_link())
            .cloned()
            .collect()
    }
}
