//! Status message management for the browser TUI.

use std::time::{Duration, Instant};

/// Severity of a status message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// Manages temporary status messages with optional auto-clear.
///
/// Status messages are displayed briefly to notify users of actions
/// (e.g., "Loaded 395 bugs", "Sorted by project ↓").
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    message: Option<String>,
    level: StatusLevel,
    /// When the message was set (for auto-clear)
    set_at: Option<Instant>,
    /// Auto-clear duration (None = no auto-clear)
    auto_clear_after: Option<Duration>,
}

impl StatusMessage {
    /// Create a new status message manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a status message manager with auto-clear after duration.
    #[must_use]
    pub const fn with_auto_clear(duration: Duration) -> Self {
        Self {
            message: None,
            level: StatusLevel::Info,
            set_at: None,
            auto_clear_after: Some(duration),
        }
    }

    /// Set an informational status message.
    pub fn set(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.level = StatusLevel::Info;
        self.set_at = Some(Instant::now());
    }

    /// Set an error message. Errors are never auto-cleared.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.level = StatusLevel::Error;
        self.set_at = None;
    }

    /// Clear the status message.
    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Clear the message unless it is an error.
    pub fn clear_info(&mut self) {
        if self.level == StatusLevel::Info {
            self.clear();
        }
    }

    /// Drop the message once its auto-clear duration has elapsed.
    pub fn expire(&mut self) {
        if let (Some(set_at), Some(duration)) = (self.set_at, self.auto_clear_after) {
            if set_at.elapsed() >= duration {
                self.clear();
            }
        }
    }

    /// Get the current message without checking auto-clear.
    #[must_use]
    pub fn peek(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn level(&self) -> StatusLevel {
        self.level
    }

    /// Check if there's an active message.
    #[must_use]
    pub const fn has_message(&self) -> bool {
        self.message.is_some()
    }
}
