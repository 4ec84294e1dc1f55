//! Configuration types for defects-browser.

use crate::browser::{MatchMode, SortSpec};
use crate::loader::{DataSource, LoadOptions};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration, loaded from a config file and
/// overridden by CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where the data documents come from
    pub data: DataConfig,
    /// Initial list settings
    pub browse: BrowseConfig,
    /// Report output for the non-interactive commands
    pub output: OutputConfig,
    /// TUI-specific configuration
    pub tui: TuiConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Data document locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DataConfig {
    /// Bug list: a local path or an http(s) URL
    pub bugs: String,
    /// Classification taxonomy: a local path or an http(s) URL
    pub classification: String,
    /// Timeout for remote requests, in seconds
    #[schemars(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bugs: "data/bugs.json".to_string(),
            classification: "data/classification.json".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DataConfig {
    #[must_use]
    pub fn bugs_source(&self) -> DataSource {
        DataSource::parse(&self.bugs)
    }

    #[must_use]
    pub fn classification_source(&self) -> DataSource {
        DataSource::parse(&self.classification)
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// A sortable column of the bug list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnConfig {
    /// Header text
    pub title: String,
    /// Sort fields applied when the column is clicked; the first one is
    /// also the value displayed
    pub sort: Vec<String>,
    /// Column width in cells
    #[serde(default = "default_column_width")]
    pub width: u16,
}

const fn default_column_width() -> u16 {
    10
}

impl ColumnConfig {
    pub fn new(title: impl Into<String>, sort: &[&str], width: u16) -> Self {
        Self {
            title: title.into(),
            sort: sort.iter().map(|s| (*s).to_string()).collect(),
            width,
        }
    }

    /// Field whose value the column shows.
    #[must_use]
    pub fn field(&self) -> &str {
        self.sort.first().map_or("", String::as_str)
    }
}

/// Initial state of the bug list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BrowseConfig {
    /// Initial sort fields; only the first one orders the list
    pub sort: Vec<String>,
    /// Start with a descending sort
    pub reverse: bool,
    /// How active filters combine: all or any
    pub match_mode: MatchMode,
    /// Show the welcome panel when the TUI starts
    pub show_welcome: bool,
    /// Columns of the bug list
    pub columns: Vec<ColumnConfig>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            sort: vec!["project".to_string(), "commit".to_string()],
            reverse: false,
            match_mode: MatchMode::All,
            show_welcome: true,
            columns: default_columns(),
        }
    }
}

fn default_columns() -> Vec<ColumnConfig> {
    vec![
        ColumnConfig::new("Project", &["project", "commit"], 14),
        ColumnConfig::new("Bug", &["commit"], 10),
        ColumnConfig::new("Files", &["metrics.files"], 7),
        ColumnConfig::new("Chunks", &["metrics.chunks"], 7),
        ColumnConfig::new("Lines", &["metrics.lines"], 7),
    ]
}

impl BrowseConfig {
    #[must_use]
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort.iter().cloned()).reversed(self.reverse)
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// TUI-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme name: "dark", "light", or "high-contrast"
    pub theme: String,
    /// Enable mouse support
    pub mouse_enabled: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            mouse_enabled: true,
        }
    }
}
