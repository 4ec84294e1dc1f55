//! View state controller.
//!
//! [`ViewController`] owns everything the browser shows: the loaded records
//! and taxonomy, the filter set, match mode and sort spec, the route history
//! and the detail view state. Every mutation goes through a transition method
//! that re-derives the visible list and the open position, then queues
//! [`ViewEvent`]s for whoever renders the state.

use super::filter::{FilterSet, MatchMode};
use super::navigation::{next_index, previous_index};
use super::route::{Route, RouteHistory};
use super::sort::SortSpec;
use crate::model::{BugRecord, Taxonomy};
use std::cell::RefCell;
use std::collections::HashMap;

/// Whether the detail view is showing a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    /// Open on a position of the visible list
    Open(usize),
}

impl DetailState {
    #[must_use]
    pub const fn position(self) -> Option<usize> {
        match self {
            Self::Closed => None,
            Self::Open(pos) => Some(pos),
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Notifications queued by controller transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The visible list was re-derived
    ListChanged,
    /// The detail view opened on a position
    Opened(usize),
    /// The open detail view now shows another position
    Updated(usize),
    /// The detail view was dismissed
    Closed,
    /// The active route changed
    RouteChanged(Route),
}

/// Owner of the browser's view state.
#[derive(Debug, Default)]
pub struct ViewController {
    bugs: Vec<BugRecord>,
    taxonomy: Taxonomy,
    filters: FilterSet,
    match_mode: MatchMode,
    sort: SortSpec,
    history: RouteHistory,
    /// Indices into `bugs`, filtered and sorted
    visible: Vec<usize>,
    detail: DetailState,
    counts: RefCell<HashMap<String, usize>>,
    events: Vec<ViewEvent>,
}

impl ViewController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller starting from a given sort spec and match mode.
    #[must_use]
    pub fn with_settings(sort: SortSpec, match_mode: MatchMode) -> Self {
        Self {
            sort,
            match_mode,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn bugs(&self) -> &[BugRecord] {
        &self.bugs
    }

    #[must_use]
    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    #[must_use]
    pub const fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        self.history.current()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    #[must_use]
    pub const fn detail(&self) -> DetailState {
        self.detail
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Records of the visible list, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &BugRecord> {
        self.visible.iter().map(|&i| &self.bugs[i])
    }

    #[must_use]
    pub fn visible_bug(&self, position: usize) -> Option<&BugRecord> {
        self.visible.get(position).map(|&i| &self.bugs[i])
    }

    /// The record shown by the detail view, if open.
    #[must_use]
    pub fn open_bug(&self) -> Option<&BugRecord> {
        self.detail.position().and_then(|pos| self.visible_bug(pos))
    }

    /// Number of loaded records whose flag `key` is `true`.
    ///
    /// Memoized per key until the records change.
    pub fn count_bugs(&self, key: &str) -> usize {
        if let Some(&count) = self.counts.borrow().get(key) {
            return count;
        }
        let count = self.bugs.iter().filter(|bug| bug.flag(key)).count();
        self.counts.borrow_mut().insert(key.to_string(), count);
        count
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Route transitions
    // ------------------------------------------------------------------

    /// Make `route` active and resolve the detail view against it.
    ///
    /// A bug route that matches nothing in the visible list leaves the detail
    /// view closed but keeps the route, so it resolves once matching data
    /// arrives.
    pub fn navigate(&mut self, route: Route) {
        if *self.history.current() != route {
            tracing::debug!(%route, "navigate");
            self.history.push(route.clone());
            self.events.push(ViewEvent::RouteChanged(route));
        }
        self.apply_route(true);
    }

    /// Open the bug at `position` of the visible list.
    ///
    /// Returns false when the position is out of range.
    pub fn open_position(&mut self, position: usize) -> bool {
        let Some(route) = self.visible_bug(position).map(Route::for_record) else {
            return false;
        };
        self.navigate(route);
        true
    }

    /// Dismiss the detail view and return to the list.
    pub fn close(&mut self) {
        self.navigate(Route::List);
    }

    /// Step to the next visible bug, wrapping at the end. No-op while closed.
    pub fn next_bug(&mut self) {
        self.step(next_index);
    }

    /// Step to the previous visible bug, wrapping at the start. No-op while closed.
    pub fn previous_bug(&mut self) {
        self.step(previous_index);
    }

    fn step(&mut self, neighbour: fn(usize, usize) -> Option<usize>) {
        let DetailState::Open(position) = self.detail else {
            return;
        };
        if let Some(target) = neighbour(position, self.visible.len()) {
            self.open_position(target);
        }
    }

    /// Re-apply the previous route. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        let Some(route) = self.history.back().cloned() else {
            return false;
        };
        tracing::debug!(%route, "back");
        self.events.push(ViewEvent::RouteChanged(route));
        self.apply_route(true);
        true
    }

    // ------------------------------------------------------------------
    // Data and view-setting transitions
    // ------------------------------------------------------------------

    pub fn set_bugs(&mut self, bugs: Vec<BugRecord>) {
        tracing::debug!(count = bugs.len(), "records replaced");
        self.bugs = bugs;
        self.counts.borrow_mut().clear();
        self.refresh();
    }

    pub fn set_taxonomy(&mut self, taxonomy: Taxonomy) {
        tracing::debug!(keys = taxonomy.len(), "taxonomy replaced");
        self.taxonomy = taxonomy;
        self.events.push(ViewEvent::ListChanged);
    }

    /// Flip one filter key, returning its new state.
    pub fn toggle_filter(&mut self, key: &str) -> bool {
        let active = self.filters.toggle(key);
        tracing::debug!(key, active, "filter toggled");
        self.refresh();
        active
    }

    pub fn set_filter(&mut self, key: &str, active: bool) {
        self.filters.set(key, active);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refresh();
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        if self.match_mode != mode {
            self.match_mode = mode;
            self.refresh();
        }
    }

    pub fn toggle_match_mode(&mut self) -> MatchMode {
        self.set_match_mode(self.match_mode.toggled());
        self.match_mode
    }

    /// Apply a column click (see [`SortSpec::click`]).
    pub fn sort_by<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.click(fields);
        tracing::debug!(sort = %self.sort.describe(), "sort changed");
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Re-derive the visible list, then the open position.
    fn refresh(&mut self) {
        let bugs = &self.bugs;
        let mut visible: Vec<usize> = (0..bugs.len())
            .filter(|&i| self.filters.accepts(&bugs[i], self.match_mode))
            .collect();
        visible.sort_by(|&a, &b| self.sort.compare(&bugs[a], &bugs[b]));
        self.visible = visible;
        self.events.push(ViewEvent::ListChanged);
        self.apply_route(false);
    }

    /// Resolve the current route against the visible list.
    ///
    /// With `force_update`, an already-open view reports `Updated` even when
    /// its position did not move.
    fn apply_route(&mut self, force_update: bool) {
        let resolved = match self.history.current() {
            Route::List => None,
            Route::Bug { project, id } => self
                .visible
                .iter()
                .position(|&i| self.bugs[i].is(project, id)),
        };

        let next = resolved.map_or(DetailState::Closed, DetailState::Open);
        match (self.detail, next) {
            (DetailState::Closed, DetailState::Open(pos)) => {
                self.events.push(ViewEvent::Opened(pos));
            }
            (DetailState::Open(old), DetailState::Open(pos)) => {
                if force_update || old != pos {
                    self.events.push(ViewEvent::Updated(pos));
                }
            }
            (DetailState::Open(_), DetailState::Closed) => {
                self.events.push(ViewEvent::Closed);
            }
            (DetailState::Closed, DetailState::Closed) => {}
        }
        self.detail = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<BugRecord> {
        vec![
            BugRecord::new("B", "2").with_field("X", true),
            BugRecord::new("A", "1"),
            BugRecord::new("C", "3").with_field("X", true),
        ]
    }

    fn loaded() -> ViewController {
        let mut ctrl = ViewController::new();
        ctrl.set_bugs(abc());
        ctrl.drain_events();
        ctrl
    }

    fn open_project(ctrl: &ViewController) -> Option<&str> {
        ctrl.open_bug().map(|b| b.project.as_str())
    }

    #[test]
    fn test_visible_list_is_sorted_by_project() {
        let ctrl = loaded();
        let projects: Vec<&str> = ctrl.visible().map(|b| b.project.as_str()).collect();
        assert_eq!(projects, ["A", "B", "C"]);
    }

    #[test]
    fn test_navigate_opens_then_updates() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("B", "2"));
        assert_eq!(ctrl.detail(), DetailState::Open(1));
        assert_eq!(
            ctrl.drain_events(),
            [
                ViewEvent::RouteChanged(Route::bug("B", "2")),
                ViewEvent::Opened(1)
            ]
        );

        ctrl.navigate(Route::bug("C", "3"));
        assert_eq!(
            ctrl.drain_events(),
            [
                ViewEvent::RouteChanged(Route::bug("C", "3")),
                ViewEvent::Updated(2)
            ]
        );
    }

    #[test]
    fn test_unknown_bug_closes_detail_and_keeps_route() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("A", "1"));
        ctrl.drain_events();

        ctrl.navigate(Route::bug("Foo", "99"));
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert_eq!(ctrl.route(), &Route::bug("Foo", "99"));
        assert!(ctrl.drain_events().contains(&ViewEvent::Closed));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("C", "3"));
        ctrl.next_bug();
        assert_eq!(open_project(&ctrl), Some("A"));
        assert_eq!(ctrl.route(), &Route::bug("A", "1"));

        ctrl.previous_bug();
        assert_eq!(open_project(&ctrl), Some("C"));
    }

    #[test]
    fn test_stepping_while_closed_is_noop() {
        let mut ctrl = loaded();
        ctrl.next_bug();
        ctrl.previous_bug();
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert_eq!(ctrl.route(), &Route::List);
        assert!(ctrl.drain_events().is_empty());
    }

    #[test]
    fn test_close_returns_to_list() {
        let mut ctrl = loaded();
        assert!(ctrl.open_position(0));
        ctrl.drain_events();

        ctrl.close();
        assert_eq!(ctrl.route(), &Route::List);
        assert_eq!(
            ctrl.drain_events(),
            [ViewEvent::RouteChanged(Route::List), ViewEvent::Closed]
        );
        assert!(!ctrl.open_position(10));
    }

    #[test]
    fn test_filter_removing_open_bug_closes_detail() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("A", "1"));
        ctrl.drain_events();

        ctrl.toggle_filter("X");
        assert_eq!(ctrl.visible_len(), 2);
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert_eq!(
            ctrl.drain_events(),
            [ViewEvent::ListChanged, ViewEvent::Closed]
        );

        // clearing the filter brings the route back into view
        ctrl.clear_filters();
        assert_eq!(open_project(&ctrl), Some("A"));
    }

    #[test]
    fn test_reordering_moves_open_position() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("A", "1"));
        ctrl.drain_events();

        ctrl.sort_by(["project"]);
        assert!(ctrl.sort_spec().reverse);
        assert_eq!(ctrl.detail(), DetailState::Open(2));
        assert_eq!(
            ctrl.drain_events(),
            [ViewEvent::ListChanged, ViewEvent::Updated(2)]
        );
    }

    #[test]
    fn test_deep_link_resolves_after_load() {
        let mut ctrl = ViewController::new();
        ctrl.navigate(Route::bug("C", "3"));
        assert_eq!(ctrl.detail(), DetailState::Closed);

        ctrl.set_bugs(abc());
        assert_eq!(open_project(&ctrl), Some("C"));
    }

    #[test]
    fn test_back_reapplies_previous_route() {
        let mut ctrl = loaded();
        ctrl.navigate(Route::bug("A", "1"));
        ctrl.navigate(Route::bug("B", "2"));

        assert!(ctrl.back());
        assert_eq!(open_project(&ctrl), Some("A"));
        assert!(ctrl.back());
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert!(!ctrl.back());
    }

    #[test]
    fn test_match_mode_toggle() {
        let mut ctrl = loaded();
        ctrl.set_filter("X", true);
        ctrl.set_filter("Y", true);
        assert_eq!(ctrl.visible_len(), 0);

        assert_eq!(ctrl.toggle_match_mode(), MatchMode::Any);
        assert_eq!(ctrl.visible_len(), 2);
    }

    #[test]
    fn test_count_bugs_is_invalidated_on_reload() {
        let mut ctrl = loaded();
        assert_eq!(ctrl.count_bugs("X"), 2);
        assert_eq!(ctrl.count_bugs("X"), 2);
        assert_eq!(ctrl.count_bugs("missing"), 0);

        ctrl.set_bugs(vec![BugRecord::new("A", "1").with_field("X", true)]);
        assert_eq!(ctrl.count_bugs("X"), 1);
    }
}
