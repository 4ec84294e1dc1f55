//! Interactive terminal UI using ratatui.
//!
//! `BrowserApp` wraps the [`ViewController`](crate::browser::ViewController)
//! with terminal-only state. The screen has a filter sidebar, the bug table,
//! a status bar and context-sensitive key hints; opening a bug shows its
//! classification and highlighted patch in a centered panel.

mod app;
pub(crate) mod constants;
mod events;
pub mod state;
pub mod theme;
mod ui;
pub mod viewmodel;
mod views;
pub(crate) mod widgets;

// Theme exports
pub use theme::{
    colors, current_theme_name, set_theme, toggle_theme, ColorScheme, FooterHints, Styles, Theme,
};

// Shared state exports
pub use state::{ListNavigation, ListState};

pub use viewmodel::{OverlayKind, OverlayState, StatusLevel, StatusMessage};

pub use app::{BrowserApp, FocusPanel};
pub use events::{handle_key_event, handle_mouse_event, Event, EventHandler};
pub use ui::run_browser_tui;
