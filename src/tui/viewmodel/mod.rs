//! `ViewModel` layer for the browser TUI.
//!
//! Small state components the app embeds instead of juggling flags:
//!
//! - [`OverlayState`] - Overlay management (welcome, help)
//! - [`StatusMessage`] - Temporary status message display

mod overlay;
mod status;

pub use overlay::{OverlayKind, OverlayState};
pub use status::{StatusLevel, StatusMessage};
