//! `BrowserApp` - TUI state around the view controller.
//!
//! The controller owns the data and the route; the app adds what only a
//! terminal needs: which panel has focus, cursors, patch scroll, overlays,
//! status messages and the column layout used for mouse hit-testing.

use crate::browser::{Route, ViewController, ViewEvent};
use crate::config::{AppConfig, ColumnConfig};
use crate::loader::LoadEvent;
use crate::model::TaxonomyEntry;
use crate::tui::constants::{PAGE_SIZE, STATUS_TIMEOUT};
use crate::tui::state::{ListNavigation, ListState};
use crate::tui::theme::Theme;
use crate::tui::viewmodel::{OverlayKind, OverlayState, StatusMessage};
use ratatui::layout::Rect;

/// Which panel receives list navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPanel {
    #[default]
    List,
    Filters,
}

impl FocusPanel {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::List => Self::Filters,
            Self::Filters => Self::List,
        }
    }
}

/// Screen areas recorded by the last render, for mouse handling.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LayoutCache {
    pub(crate) table: Rect,
    pub(crate) sidebar: Rect,
    /// First visible table row
    pub(crate) table_offset: usize,
    /// First visible sidebar row
    pub(crate) sidebar_offset: usize,
}

/// Which document loads are still outstanding.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Pending {
    pub(crate) bugs: bool,
    pub(crate) taxonomy: bool,
}

/// Main application state for the defects browser.
pub struct BrowserApp {
    controller: ViewController,

    /// Table columns, each bound to a sort field list
    pub(crate) columns: Vec<ColumnConfig>,

    /// Column whose fields the list is sorted by
    pub(crate) sort_column: usize,

    /// Cursor in the visible bug list
    pub(crate) list: ListState,

    /// Cursor in the filter sidebar (taxonomy entries)
    pub(crate) filter_cursor: ListState,

    pub(crate) focus: FocusPanel,

    /// First patch line shown in the detail view
    pub(crate) patch_scroll: u16,

    pub(crate) overlays: OverlayState,

    pub(crate) status: StatusMessage,

    pub(crate) mouse_enabled: bool,

    /// Theme applied when the terminal starts
    pub(crate) theme: &'static str,

    pub(crate) pending: Pending,

    pub(crate) layout: LayoutCache,

    /// Should quit
    pub(crate) should_quit: bool,

    /// Animation tick counter
    pub(crate) tick: u64,
}

impl BrowserApp {
    /// Create the app from configuration. Data arrives later through
    /// [`BrowserApp::handle_load`] or the controller.
    pub fn new(config: &AppConfig) -> Self {
        let columns = config.browse.columns.clone();
        let sort = config.browse.sort_spec();
        let sort_column = columns
            .iter()
            .position(|c| c.sort == sort.fields)
            .unwrap_or(0);

        let mut overlays = OverlayState::new();
        if config.browse.show_welcome {
            overlays.show(OverlayKind::Welcome);
        }

        Self {
            controller: ViewController::with_settings(sort, config.browse.match_mode),
            columns,
            sort_column,
            list: ListState::default(),
            filter_cursor: ListState::default(),
            focus: FocusPanel::List,
            patch_scroll: 0,
            overlays,
            status: StatusMessage::with_auto_clear(STATUS_TIMEOUT),
            mouse_enabled: config.tui.mouse_enabled,
            theme: Theme::from_name(&config.tui.theme).name,
            pending: Pending::default(),
            layout: LayoutCache::default(),
            should_quit: false,
            tick: 0,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Mutable access for setup (loading data, deep links) before the loop
    /// starts. Call [`BrowserApp::sync`] afterwards.
    pub fn controller_mut(&mut self) -> &mut ViewController {
        &mut self.controller
    }

    /// Start at a deep link. The welcome panel would cover the bug, so it is
    /// skipped.
    pub fn start_at(&mut self, route: Route) {
        self.skip_welcome();
        self.controller.navigate(route);
        self.sync();
    }

    /// Drop the welcome panel for a view prepared on the command line.
    pub fn skip_welcome(&mut self) {
        if self.overlays.is_showing(OverlayKind::Welcome) {
            self.overlays.close();
        }
    }

    /// Mark both documents as being loaded in the background.
    pub fn expect_loads(&mut self) {
        self.pending = Pending {
            bugs: true,
            taxonomy: true,
        };
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.bugs || self.pending.taxonomy
    }

    /// Apply a finished background load.
    pub fn handle_load(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Bugs(Ok(bugs)) => {
                self.pending.bugs = false;
                let count = bugs.len();
                self.controller.set_bugs(bugs);
                self.status.set(format!("Loaded {count} bugs"));
            }
            LoadEvent::Bugs(Err(err)) => {
                self.pending.bugs = false;
                self.status.set_error(format!("Failed to load bugs: {err}"));
            }
            LoadEvent::Taxonomy(Ok(taxonomy)) => {
                self.pending.taxonomy = false;
                self.controller.set_taxonomy(taxonomy);
            }
            LoadEvent::Taxonomy(Err(err)) => {
                self.pending.taxonomy = false;
                self.status
                    .set_error(format!("Failed to load classification: {err}"));
            }
        }
        self.sync();
    }

    /// Drain controller events into terminal state.
    pub fn sync(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                ViewEvent::ListChanged => {
                    self.list.resize(self.controller.visible_len());
                    self.filter_cursor.resize(self.controller.taxonomy().len());
                }
                ViewEvent::Opened(position) | ViewEvent::Updated(position) => {
                    self.list.select(position);
                    self.patch_scroll = 0;
                }
                ViewEvent::Closed => {}
                ViewEvent::RouteChanged(route) => {
                    tracing::debug!(%route, "route changed");
                }
            }
        }
    }

    /// Taxonomy entries in sidebar order.
    pub(crate) fn filter_entries(&self) -> Vec<TaxonomyEntry<'_>> {
        self.controller.taxonomy().entries().collect()
    }

    // ------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------

    pub fn open_selected(&mut self) {
        if !self.controller.open_position(self.list.selected()) {
            self.status.set("Nothing to open");
        }
        self.sync();
    }

    pub fn close_detail(&mut self) {
        self.controller.close();
        self.sync();
    }

    pub fn next_bug(&mut self) {
        self.controller.next_bug();
        self.sync();
    }

    pub fn previous_bug(&mut self) {
        self.controller.previous_bug();
        self.sync();
    }

    /// Go back in route history.
    pub fn go_back(&mut self) {
        if !self.controller.back() {
            self.status.set("No previous view");
        }
        self.sync();
    }

    pub fn scroll_patch(&mut self, delta: i32) {
        let scrolled = i32::from(self.patch_scroll).saturating_add(delta);
        self.patch_scroll = u16::try_from(scrolled.max(0)).unwrap_or(u16::MAX);
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Toggle the filter under the sidebar cursor.
    pub fn toggle_focused_filter(&mut self) {
        let Some(key) = self
            .filter_entries()
            .get(self.filter_cursor.selected())
            .map(|entry| entry.key.to_string())
        else {
            return;
        };
        self.controller.toggle_filter(&key);
        self.sync();
    }

    pub fn toggle_match_mode(&mut self) {
        let mode = self.controller.toggle_match_mode();
        self.status.set(format!("Match {mode}"));
        self.sync();
    }

    pub fn clear_filters(&mut self) {
        self.controller.clear_filters();
        self.status.set("Filters cleared");
        self.sync();
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Click on a column header: same column reverses, another column
    /// sorts ascending by its fields.
    pub fn sort_by_column(&mut self, column: usize) {
        let Some(fields) = self.columns.get(column).map(|c| c.sort.clone()) else {
            return;
        };
        self.sort_column = column;
        self.controller.sort_by(fields);
        self.status
            .set(format!("Sorted by {}", self.controller.sort_spec().describe()));
        self.sync();
    }

    /// Move the sort to the next column.
    pub fn cycle_sort_column(&mut self) {
        if self.columns.is_empty() {
            return;
        }
        self.sort_by_column((self.sort_column + 1) % self.columns.len());
    }

    /// Re-click the current sort column.
    pub fn reverse_sort(&mut self) {
        self.sort_by_column(self.sort_column);
    }

    // ------------------------------------------------------------------
    // Cursor movement in the focused panel
    // ------------------------------------------------------------------

    fn focused(&mut self) -> &mut ListState {
        match self.focus {
            FocusPanel::List => &mut self.list,
            FocusPanel::Filters => &mut self.filter_cursor,
        }
    }

    pub fn navigate_up(&mut self) {
        self.focused().select_prev();
    }

    pub fn navigate_down(&mut self) {
        self.focused().select_next();
    }

    pub fn page_up(&mut self) {
        self.focused().page_up();
    }

    pub fn page_down(&mut self) {
        self.focused().page_down();
    }

    pub fn go_first(&mut self) {
        self.focused().go_first();
    }

    pub fn go_last(&mut self) {
        self.focused().go_last();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggled();
    }

    pub(crate) const fn patch_page() -> i32 {
        PAGE_SIZE as i32
    }
}
