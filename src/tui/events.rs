//! Event handling for the `BrowserApp`.

use super::app::{BrowserApp, FocusPanel};
use super::state::ListNavigation;
use super::viewmodel::OverlayKind;
use super::views;
use crate::loader::LoadEvent;
use crate::tui::constants::TICK_RATE_MS;
use crate::tui::toggle_theme;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Terminal and background events, delivered on one channel.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    /// A background document load finished
    Loaded(LoadEvent),
}

impl From<LoadEvent> for Event {
    fn from(event: LoadEvent) -> Self {
        Self::Loaded(event)
    }
}

/// Event handler.
///
/// A polling thread forwards terminal input; [`EventHandler::sender`] lets
/// other threads (the loaders) post on the same channel.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let event_tx = tx.clone();
        thread::spawn(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };
            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Sender for posting events from other threads.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}

/// Handle key events for `BrowserApp`.
pub fn handle_key_event(app: &mut BrowserApp, key: KeyEvent) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Any key acknowledges an info message; load errors stay up
    app.status.clear_info();

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The welcome panel goes away on any key
    if app.overlays.is_showing(OverlayKind::Welcome) {
        app.overlays.close();
        return;
    }

    if app.overlays.is_showing(OverlayKind::Help) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?')) {
            app.overlays.close();
        }
        return;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.overlays.toggle_help();
            return;
        }
        KeyCode::Char('T') => {
            let name = toggle_theme();
            app.status.set(format!("Theme: {name}"));
            return;
        }
        KeyCode::Char('b') | KeyCode::Backspace => {
            app.go_back();
            return;
        }
        _ => {}
    }

    if app.controller().detail().is_open() {
        handle_detail_key(app, key);
    } else {
        handle_list_key(app, key);
    }
}

fn handle_detail_key(app: &mut BrowserApp, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.next_bug(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_bug(),
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_patch(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_patch(-1),
        KeyCode::PageDown => app.scroll_patch(BrowserApp::patch_page()),
        KeyCode::PageUp => app.scroll_patch(-BrowserApp::patch_page()),
        KeyCode::Home | KeyCode::Char('g') => app.patch_scroll = 0,
        _ => {}
    }
}

fn handle_list_key(app: &mut BrowserApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.focus == FocusPanel::Filters {
                app.focus = FocusPanel::List;
            }
        }
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Up | KeyCode::Char('k') => app.navigate_up(),
        KeyCode::Down | KeyCode::Char('j') => app.navigate_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home | KeyCode::Char('g') => app.go_first(),
        KeyCode::End | KeyCode::Char('G') => app.go_last(),
        KeyCode::Char(' ') if app.focus == FocusPanel::Filters => app.toggle_focused_filter(),
        KeyCode::Enter => match app.focus {
            FocusPanel::List => app.open_selected(),
            FocusPanel::Filters => app.toggle_focused_filter(),
        },
        KeyCode::Char('m') => app.toggle_match_mode(),
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Char('s') => app.cycle_sort_column(),
        KeyCode::Char('r') => app.reverse_sort(),
        _ => {}
    }
}

/// Handle mouse events for `BrowserApp`.
pub fn handle_mouse_event(app: &mut BrowserApp, mouse: MouseEvent) {
    if !app.mouse_enabled || app.overlays.has_overlay() {
        return;
    }

    let detail_open = app.controller().detail().is_open();
    match mouse.kind {
        MouseEventKind::ScrollDown if detail_open => app.scroll_patch(3),
        MouseEventKind::ScrollUp if detail_open => app.scroll_patch(-3),
        MouseEventKind::ScrollDown => app.navigate_down(),
        MouseEventKind::ScrollUp => app.navigate_up(),
        MouseEventKind::Down(MouseButton::Left) if !detail_open => {
            handle_click(app, mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn handle_click(app: &mut BrowserApp, column: u16, row: u16) {
    let table = app.layout.table;
    let sidebar = app.layout.sidebar;

    if contains(table, column, row) {
        app.focus = FocusPanel::List;
        match views::table_hit(app, column, row) {
            Some(views::TableHit::Header(index)) => app.sort_by_column(index),
            Some(views::TableHit::Row(position)) => {
                if position == app.list.selected {
                    app.open_selected();
                } else {
                    app.list.select(position);
                }
            }
            None => {}
        }
    } else if contains(sidebar, column, row) {
        app.focus = FocusPanel::Filters;
        if let Some(index) = views::sidebar_hit(app, row) {
            app.filter_cursor.select(index);
            app.toggle_focused_filter();
        }
    }
}

const fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}
