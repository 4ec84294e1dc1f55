//! Overlay state management for the browser TUI.

/// Available overlay types.
///
/// The bug detail view is not an overlay here: it follows the route and
/// lives in the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Startup welcome panel
    Welcome,
    /// Help/shortcuts overlay
    Help,
}

/// Manages overlay visibility with mutual exclusion.
///
/// Only one overlay can be visible at a time - showing a new overlay
/// automatically closes others.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    current: Option<OverlayKind>,
}

impl OverlayState {
    /// Create a new overlay state with no overlay visible.
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Check if any overlay is currently visible.
    pub const fn has_overlay(&self) -> bool {
        self.current.is_some()
    }

    /// Check if a specific overlay is visible.
    pub fn is_showing(&self, kind: OverlayKind) -> bool {
        self.current == Some(kind)
    }

    /// Get the currently visible overlay.
    pub const fn current(&self) -> Option<OverlayKind> {
        self.current
    }

    /// Show a specific overlay, closing any other.
    pub fn show(&mut self, kind: OverlayKind) {
        self.current = Some(kind);
    }

    /// Close the current overlay.
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Toggle a specific overlay.
    ///
    /// If the overlay is showing, close it. Otherwise, show it.
    pub fn toggle(&mut self, kind: OverlayKind) {
        if self.current == Some(kind) {
            self.current = None;
        } else {
            self.current = Some(kind);
        }
    }

    /// Toggle help overlay.
    pub fn toggle_help(&mut self) {
        self.toggle(OverlayKind::Help);
    }
}
