//! Labels command handler.
//!
//! Implements the `labels` subcommand: the classification taxonomy as a flat
//! key listing, optionally with how many bugs carry each key.

use super::{auto_detect_format, exit_codes, load_dataset, write_output, OutputTarget};
use crate::config::AppConfig;
use crate::loader::load_taxonomy;
use crate::model::{BugRecord, Taxonomy};
use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use serde::Serialize;

/// Options of the labels command.
#[derive(Debug, Clone, Default)]
pub struct LabelsQuery {
    /// Only list keys of this category
    pub category: Option<String>,
    /// Count the bugs carrying each key (loads the bug list too)
    pub counts: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct LabelRow<'a> {
    category: &'a str,
    group: &'a str,
    key: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

fn label_rows<'a>(
    taxonomy: &'a Taxonomy,
    bugs: Option<&[BugRecord]>,
    category: Option<&str>,
) -> Vec<LabelRow<'a>> {
    taxonomy
        .entries()
        .filter(|entry| category.map_or(true, |c| entry.category.eq_ignore_ascii_case(c)))
        .map(|entry| LabelRow {
            category: entry.category,
            group: entry.group,
            key: entry.key,
            label: entry.label.display(),
            count: bugs.map(|bugs| bugs.iter().filter(|b| b.flag(entry.key)).count()),
        })
        .collect()
}

fn render_text(rows: &[LabelRow<'_>]) -> String {
    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    let mut out = Vec::new();
    let mut heading: Option<(&str, &str)> = None;

    for row in rows {
        if heading != Some((row.category, row.group)) {
            if heading.map(|(c, _)| c) != Some(row.category) {
                if heading.is_some() {
                    out.push(String::new());
                }
                out.push(format!("{}:", row.category));
            }
            out.push(format!("  {}:", row.group));
            heading = Some((row.category, row.group));
        }
        let count = row.count.map(|n| format!(" ({n})")).unwrap_or_default();
        out.push(format!(
            "    {:<key_width$}  {}{count}",
            row.key, row.label
        ));
    }
    out.join("\n")
}

/// Run the labels command
pub fn run_labels(config: &AppConfig, query: &LabelsQuery) -> Result<i32> {
    let (bugs, taxonomy) = if query.counts {
        let (bugs, taxonomy) = load_dataset(&config.data)?;
        (Some(bugs), taxonomy)
    } else {
        let taxonomy = load_taxonomy(
            &config.data.classification_source(),
            &config.data.load_options(),
        )
        .with_context(|| {
            format!(
                "Failed to load classification from {}",
                config.data.classification
            )
        })?;
        (None, taxonomy)
    };

    let rows = label_rows(&taxonomy, bugs.as_deref(), query.category.as_deref());

    let target = OutputTarget::from_option(config.output.file.clone());
    let content = match auto_detect_format(config.output.format, &target) {
        ReportFormat::Json => {
            serde_json::to_string_pretty(&rows).context("Failed to serialize labels")?
        }
        _ => render_text(&rows),
    };
    write_output(&content, &target, false)?;

    if rows.is_empty() {
        Ok(exit_codes::NO_MATCH)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
