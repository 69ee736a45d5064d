use std::collections::BTreeSet;

/// Tri-state of the "select all" header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckbox {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Ids checked by the operator.
///
/// Independent of the filters: hiding a selected row does not unselect it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<u32>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: u32, selected: bool) {
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Check or uncheck every visible row; hidden selections are left alone.
    pub fn toggle_all(&mut self, visible: &[u32], selected: bool) {
        for id in visible {
            self.toggle(*id, selected);
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }

    /// Drop ids that no longer exist in the canonical data.
    pub fn retain_existing(&mut self, existing: impl Fn(u32) -> bool) {
        self.ids.retain(|id| existing(*id));
    }

    /// Selected ids that are not among `visible`
    pub fn hidden(&self, visible: &[u32]) -> Vec<u32> {
        self.ids
            .iter()
            .copied()
            .filter(|id| !visible.contains(id))
            .collect()
    }

    /// Compare checked visible rows against the visible row count.
    pub fn header_state(&self, visible: &[u32]) -> HeaderCheckbox {
        if visible.is_empty() {
            return HeaderCheckbox::Unchecked;
        }
        let checked = visible.iter().filter(|id| self.contains(**id)).count();
        if checked == 0 {
            HeaderCheckbox::Unchecked
        } else if checked == visible.len() {
            HeaderCheckbox::Checked
        } else {
            HeaderCheckbox::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_tri_state_with_five_visible_rows() {
        let visible = [1, 2, 3, 4, 5];
        let mut selection = SelectionSet::new();
        assert_eq!(selection.header_state(&visible), HeaderCheckbox::Unchecked);

        selection.toggle(2, true);
        selection.toggle(4, true);
        assert_eq!(selection.header_state(&visible), HeaderCheckbox::Indeterminate);

        selection.toggle_all(&visible, true);
        assert_eq!(selection.header_state(&visible), HeaderCheckbox::Checked);

        selection.toggle(3, false);
        assert_eq!(selection.header_state(&visible), HeaderCheckbox::Indeterminate);
    }

    #[test]
    fn no_visible_rows_is_unchecked() {
        let mut selection = SelectionSet::new();
        selection.toggle(9, true);
        assert_eq!(selection.header_state(&[]), HeaderCheckbox::Unchecked);
    }

    #[test]
    fn select_all_only_touches_visible_rows() {
        let mut selection = SelectionSet::new();
        selection.toggle(42, true);
        selection.toggle_all(&[1, 2], true);
        assert_eq!(selection.ids(), vec![1, 2, 42]);

        selection.toggle_all(&[1, 2], false);
        assert_eq!(selection.ids(), vec![42]);
        assert_eq!(selection.hidden(&[1, 2]), vec![42]);
    }
}
