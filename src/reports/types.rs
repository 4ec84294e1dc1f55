//! Report type definitions.

use crate::browser::{MatchMode, SortSpec, ViewController};
use crate::config::ColumnConfig;
use crate::model::{BugRecord, Taxonomy};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: TUI if TTY, summary otherwise
    #[default]
    Auto,
    /// Interactive TUI display
    Tui,
    /// Brief summary output
    Summary,
    /// Compact table for terminal (colored)
    Table,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Tui => write!(f, "tui"),
            Self::Summary => write!(f, "summary"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Columns shown by tabular reports
    pub columns: Vec<ColumnConfig>,
    /// Maximum bugs listed (None for all)
    pub max_items: Option<usize>,
    /// Include patch text in bug reports
    pub include_patch: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: crate::config::BrowseConfig::default().columns,
            max_items: None,
            include_patch: true,
        }
    }
}

/// A snapshot of the visible bug list, as reports see it.
#[derive(Debug, Clone)]
pub struct ListReport<'a> {
    /// Visible records in display order
    pub bugs: Vec<&'a BugRecord>,
    /// Number of loaded records before filtering
    pub total: usize,
    /// Active filter keys
    pub filters: Vec<&'a str>,
    pub match_mode: MatchMode,
    pub sort: &'a SortSpec,
    pub taxonomy: &'a Taxonomy,
}

impl<'a> ListReport<'a> {
    /// Capture the controller's visible list.
    #[must_use]
    pub fn from_controller(ctrl: &'a ViewController) -> Self {
        Self {
            bugs: ctrl.visible().collect(),
            total: ctrl.bugs().len(),
            filters: ctrl.filters().active_keys().collect(),
            match_mode: ctrl.match_mode(),
            sort: ctrl.sort_spec(),
            taxonomy: ctrl.taxonomy(),
        }
    }

    /// Records per project, in order of first appearance.
    #[must_use]
    pub fn project_counts(&self) -> Vec<(&'a str, usize)> {
        let mut counts: indexmap::IndexMap<&'a str, usize> = indexmap::IndexMap::new();
        for bug in &self.bugs {
            *counts.entry(bug.project.as_str()).or_default() += 1;
        }
        counts.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_matches_value_names() {
        for format in ReportFormat::value_variants() {
            let name = format.to_string();
            assert_eq!(ReportFormat::from_str(&name, true).ok(), Some(*format));
        }
    }

    #[test]
    fn test_list_report_from_controller() {
        let mut ctrl = ViewController::new();
        ctrl.set_bugs(vec![
            BugRecord::new("Lang", "1").with_field("X", true),
            BugRecord::new("Chart", "2"),
            BugRecord::new("Lang", "3").with_field("X", true),
        ]);
        ctrl.toggle_filter("X");

        let report = ListReport::from_controller(&ctrl);
        assert_eq!(report.total, 3);
        assert_eq!(report.bugs.len(), 2);
        assert_eq!(report.filters, ["X"]);
        assert_eq!(report.project_counts(), [("Lang", 2)]);
    }
}
