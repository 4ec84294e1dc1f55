//! Named constants for TUI layout and navigation.

use std::time::Duration;

/// Number of items to scroll per page-up/page-down action.
pub(crate) const PAGE_SIZE: usize = 10;

/// Event poll interval in milliseconds.
pub(crate) const TICK_RATE_MS: u64 = 100;

/// Width of the filter sidebar in columns.
pub(crate) const SIDEBAR_WIDTH: u16 = 34;

/// Minimum terminal size the layout renders into.
pub(crate) const MIN_WIDTH: u16 = 60;
pub(crate) const MIN_HEIGHT: u16 = 15;

/// How long a status message stays in the footer.
pub(crate) const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
