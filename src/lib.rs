//! **Browse bug-fix benchmark datasets and their repair classification.**
//!
//! `defects-browser` loads two JSON documents: a list of bug records (one per
//! fixed bug, with its patch, metrics and boolean classification flags) and a
//! nested classification taxonomy that turns flag keys into human-readable
//! labels. On top of them it offers a filterable, sortable list and a detail
//! view that steps through the visible bugs, as a library, a set of report
//! commands and an interactive terminal UI.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`BugRecord`] and [`Taxonomy`], plus label lookup and
//!   classification of a record's flags by category.
//! - **[`browser`]**: the pure browsing core. [`FilterSet`] decides which
//!   records are visible, [`SortSpec`] orders them, and [`ViewController`]
//!   owns the state (filters, sort, route, open position) and reports changes
//!   as [`ViewEvent`]s.
//! - **[`loader`]**: reads the documents from files or URLs, synchronously or
//!   on background threads.
//! - **[`reports`]**: summary, table and JSON output for the list and for
//!   single bugs.
//! - **[`tui`]**: the interactive browser.
//!
//! ## Getting Started
//!
//! ```no_run
//! use defects_browser::{loader, Route, ViewController};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = loader::LoadOptions::default();
//!     let bugs = loader::load_bugs(&"data/bugs.json".parse()?, &options)?;
//!     let taxonomy = loader::load_taxonomy(&"data/classification.json".parse()?, &options)?;
//!
//!     let mut ctrl = ViewController::new();
//!     ctrl.set_bugs(bugs);
//!     ctrl.set_taxonomy(taxonomy);
//!     ctrl.toggle_filter("wrapsIf");
//!
//!     println!("{} bugs wrap code in an if", ctrl.visible_len());
//!
//!     ctrl.navigate(Route::parse("/bug/Closure/12")?);
//!     if let Some(bug) = ctrl.open_bug() {
//!         for group in ctrl.taxonomy().classify(bug) {
//!             println!("{}: {} flags", group.category, group.flags.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): fetch documents over HTTP(S) with `reqwest`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Cast safety: usize↔u16 casts are pervasive in TUI layout math and all
    // values are bounded by the terminal size
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // TUI render functions are inherently long; splitting hurts readability
    clippy::too_many_lines,
    // State structs legitimately use many bools for toggle flags
    clippy::struct_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod reports;
pub mod tui;

// Re-export main types for convenience
pub use browser::{
    DetailState, FilterSet, MatchMode, Route, RouteHistory, SortSpec, ViewController, ViewEvent,
};
pub use config::{AppConfig, BrowseConfig, ConfigError, DataConfig, TuiConfig, Validatable};
pub use error::{BrowserError, ErrorContext, Result};
pub use loader::{DataSource, LoadEvent, LoadOptions};
pub use model::{BugRecord, FieldValue, Label, Taxonomy, TaxonomyEntry};
pub use reports::{ReportFormat, ReportGenerator};

// TUI shared ViewModel exports for building custom TUI components
pub use tui::{ListNavigation, ListState, OverlayState, StatusMessage};
