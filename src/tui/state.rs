//! Selection state shared by the bug table and the filter sidebar.
//!
//! Cursors stop at both ends. Wraparound belongs to the detail view's
//! previous/next stepping, not to cursor movement.

use super::constants::PAGE_SIZE;

/// A cursor over a list whose length changes whenever the controller
/// re-derives the visible bugs or the taxonomy is replaced.
pub trait ListNavigation {
    fn selected(&self) -> usize;

    fn set_selected(&mut self, idx: usize);

    fn total(&self) -> usize;

    fn set_total(&mut self, total: usize);

    /// Index of the last row, `None` for an empty list.
    fn last(&self) -> Option<usize> {
        self.total().checked_sub(1)
    }

    /// Jump to `idx`, clamped to the last row.
    fn select(&mut self, idx: usize) {
        self.set_selected(self.last().map_or(0, |last| idx.min(last)));
    }

    /// Adopt a new length, keeping the cursor on a valid row.
    fn resize(&mut self, total: usize) {
        self.set_total(total);
        self.select(self.selected());
    }

    /// Move the cursor by `delta` rows, stopping at either end.
    fn move_by(&mut self, delta: isize) {
        let target = self.selected().saturating_add_signed(delta);
        self.select(target);
    }

    fn select_next(&mut self) {
        self.move_by(1);
    }

    fn select_prev(&mut self) {
        self.move_by(-1);
    }

    fn page_up(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }

    fn page_down(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    fn go_first(&mut self) {
        self.set_selected(0);
    }

    fn go_last(&mut self) {
        self.select(usize::MAX);
    }
}

/// Plain cursor used for both panels.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub total: usize,
}

impl ListState {
    pub fn with_total(total: usize) -> Self {
        Self { selected: 0, total }
    }
}

impl ListNavigation for ListState {
    fn selected(&self) -> usize {
        self.selected
    }

    fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
    }

    fn total(&self) -> usize {
        self.total
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
    }
}
