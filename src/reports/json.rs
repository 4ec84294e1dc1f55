//! JSON report generator.

use super::{ListReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::browser::MatchMode;
use crate::model::{BugRecord, Taxonomy};
use indexmap::IndexMap;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

const TOOL: ToolInfo = ToolInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

#[derive(Serialize)]
struct JsonListReport<'a> {
    tool: ToolInfo,
    total: usize,
    shown: usize,
    match_mode: MatchMode,
    filters: Vec<JsonLabel<'a>>,
    sort: &'a [String],
    reverse: bool,
    bugs: Vec<JsonBugEntry<'a>>,
}

#[derive(Serialize)]
struct JsonLabel<'a> {
    key: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct JsonBugEntry<'a> {
    project: &'a str,
    commit: &'a str,
    classification: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<&'a str>,
    #[serde(flatten)]
    fields: IndexMap<&'a str, &'a serde_json::Value>,
}

impl<'a> JsonBugEntry<'a> {
    /// Non-flag fields go to `fields`; `true` flags are listed by key.
    fn new(bug: &'a BugRecord, include_patch: bool) -> Self {
        Self {
            project: &bug.project,
            commit: &bug.commit,
            classification: bug.active_flags().collect(),
            patch: include_patch.then_some(bug.patch.as_str()),
            fields: bug
                .fields
                .iter()
                .filter(|(_, v)| !v.is_boolean())
                .map(|(k, v)| (k.as_str(), v))
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonBugReport<'a> {
    tool: ToolInfo,
    #[serde(flatten)]
    bug: JsonBugEntry<'a>,
    labels: IndexMap<&'a str, Vec<JsonLabel<'a>>>,
}

impl ReportGenerator for JsonReporter {
    fn generate_list_report(
        &self,
        list: &ListReport<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let limit = config.max_items.unwrap_or(usize::MAX);
        let report = JsonListReport {
            tool: TOOL,
            total: list.total,
            shown: list.bugs.len(),
            match_mode: list.match_mode,
            filters: list
                .filters
                .iter()
                .map(|&key| JsonLabel {
                    key,
                    label: list.taxonomy.label(key),
                })
                .collect(),
            sort: &list.sort.fields,
            reverse: list.sort.reverse,
            bugs: list
                .bugs
                .iter()
                .take(limit)
                .map(|bug| JsonBugEntry::new(bug, false))
                .collect(),
        };
        self.render(&report)
    }

    fn generate_bug_report(
        &self,
        bug: &BugRecord,
        taxonomy: &Taxonomy,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let labels = taxonomy
            .classify(bug)
            .into_iter()
            .map(|group| {
                let flags = group
                    .flags
                    .into_iter()
                    .map(|(_, key, label)| JsonLabel { key, label })
                    .collect();
                (group.category, flags)
            })
            .collect();

        let report = JsonBugReport {
            tool: TOOL,
            bug: JsonBugEntry::new(bug, config.include_patch),
            labels,
        };
        self.render(&report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
