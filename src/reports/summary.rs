//! Summary and table report generators for shell output.

use super::{truncate, ListReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::{BugRecord, Taxonomy};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Classification lines shared by both reporters' bug reports.
fn classification_lines(
    bug: &BugRecord,
    taxonomy: &Taxonomy,
    color: impl Fn(&str, &str) -> String,
) -> Vec<String> {
    let groups = taxonomy.classify(bug);
    if groups.is_empty() {
        return vec![format!("  {}", color("No classification", "dim"))];
    }
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("  {}", color(group.category, "cyan")));
        for (_, key, label) in group.flags {
            if label == key {
                lines.push(format!("    • {label}"));
            } else {
                lines.push(format!("    • {label} {}", color(&format!("({key})"), "dim")));
            }
        }
    }
    lines
}

fn patch_lines(bug: &BugRecord, color: impl Fn(&str, &str) -> String) -> Vec<String> {
    bug.patch
        .lines()
        .map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                color(line, "bold")
            } else if line.starts_with("@@") {
                color(line, "cyan")
            } else if line.starts_with('+') {
                color(line, "green")
            } else if line.starts_with('-') {
                color(line, "red")
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_list_report(
        &self,
        list: &ListReport<'_>,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color("Defects Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        lines.push(format!(
            "{}  {} of {} bugs",
            self.color("Shown:", "cyan"),
            list.bugs.len(),
            list.total
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Sort:", "cyan"),
            list.sort.describe()
        ));

        if list.filters.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Filters:", "cyan"),
                self.color("none", "dim")
            ));
        } else {
            lines.push(format!(
                "{}  match {}",
                self.color("Filters:", "cyan"),
                list.match_mode
            ));
            for key in &list.filters {
                lines.push(format!("  • {}", list.taxonomy.label(key)));
            }
        }

        let projects = list.project_counts();
        if !projects.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Projects:", "bold"));
            for (project, count) in projects {
                lines.push(format!(
                    "  {:<16} {}",
                    project,
                    self.color(&count.to_string(), "green")
                ));
            }
        }

        if list.bugs.is_empty() {
            lines.push(String::new());
            lines.push(self.color("No bugs match the current filters", "yellow"));
        }

        Ok(lines.join("\n"))
    }

    fn generate_bug_report(
        &self,
        bug: &BugRecord,
        taxonomy: &Taxonomy,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        let color = |text: &str, c: &str| self.color(text, c);

        lines.push(self.color(&format!("{} {}", bug.project, bug.commit), "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        let (added, removed) = bug.patch_stats();
        lines.push(format!(
            "{}  {} {}",
            self.color("Patch:", "cyan"),
            self.color(&format!("+{added}"), "green"),
            self.color(&format!("-{removed}"), "red")
        ));

        lines.push(String::new());
        lines.push(self.color("Classification:", "bold"));
        lines.extend(classification_lines(bug, taxonomy, color));

        if config.include_patch && !bug.patch.is_empty() {
            lines.push(String::new());
            lines.extend(patch_lines(bug, color));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter for compact terminal output
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Pad before coloring so escapes do not skew alignment.
    fn cell(&self, text: &str, width: usize, color: &str) -> String {
        let padded = format!("{:<width$}", truncate(text, width));
        self.color(&padded, color)
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_list_report(
        &self,
        list: &ListReport<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        let widths: Vec<usize> = config.columns.iter().map(|c| usize::from(c.width)).collect();
        let rule_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let header: Vec<String> = config
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| self.cell(&col.title.to_uppercase(), w, "bold"))
            .collect();
        lines.push(header.join(" ").trim_end().to_string());
        lines.push("─".repeat(rule_width));

        let limit = config.max_items.unwrap_or(usize::MAX);
        for bug in list.bugs.iter().take(limit) {
            let row: Vec<String> = config
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| {
                    let value = bug.field(col.field()).display();
                    let color = if col.field() == "project" { "cyan" } else { "" };
                    self.cell(&value, w, color)
                })
                .collect();
            lines.push(row.join(" ").trim_end().to_string());
        }

        if list.bugs.len() > limit {
            lines.push(self.color(
                &format!("... and {} more bugs", list.bugs.len() - limit),
                "dim",
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Total: {} of {} bugs | Sort: {} | Filters: {}",
            list.bugs.len(),
            list.total,
            list.sort.describe(),
            if list.filters.is_empty() {
                "none".to_string()
            } else {
                format!("{} ({})", list.filters.join(", "), list.match_mode)
            }
        ));

        Ok(lines.join("\n"))
    }

    fn generate_bug_report(
        &self,
        bug: &BugRecord,
        taxonomy: &Taxonomy,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        let color = |text: &str, c: &str| self.color(text, c);

        lines.push(format!(
            "{} {}",
            self.cell("FIELD", 24, "bold"),
            self.color("VALUE", "bold")
        ));
        lines.push("─".repeat(60));
        lines.push(format!("{} {}", self.cell("project", 24, "cyan"), bug.project));
        lines.push(format!("{} {}", self.cell("commit", 24, "cyan"), bug.commit));
        for (key, value) in &bug.fields {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!(
                "{} {}",
                self.cell(&taxonomy.label(key).to_string(), 24, ""),
                shown
            ));
        }

        lines.push(String::new());
        lines.extend(classification_lines(bug, taxonomy, color));

        if config.include_patch && !bug.patch.is_empty() {
            lines.push(String::new());
            lines.extend(patch_lines(bug, color));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}
