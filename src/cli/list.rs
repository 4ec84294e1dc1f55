//! List command handler.
//!
//! Implements the `list` subcommand: the filtered, sorted bug list as a
//! report, or the browser preloaded with the same view.

use super::{
    auto_detect_format, exit_codes, load_dataset, should_use_color, write_output, OutputTarget,
};
use crate::browser::ViewController;
use crate::config::AppConfig;
use crate::model::{BugRecord, Taxonomy};
use crate::reports::{create_reporter_with_options, ListReport, ReportConfig, ReportFormat};
use crate::tui::{run_browser_tui, BrowserApp};
use anyhow::{Context, Result};

/// What to show in the bug list.
///
/// Sort order and match mode come from [`AppConfig::browse`].
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Classification keys that must be set (combined by the match mode)
    pub filters: Vec<String>,
    /// Maximum number of bugs listed
    pub limit: Option<usize>,
}

/// Activate `filters` on the controller, warning about keys the taxonomy
/// does not know.
pub fn apply_filters(ctrl: &mut ViewController, filters: &[String]) {
    for key in filters {
        if !ctrl.taxonomy().is_empty() && ctrl.taxonomy().find(key).is_none() {
            tracing::warn!("Unknown classification key '{key}'");
        }
        ctrl.set_filter(key, true);
    }
}

/// Run the list command
pub fn run_list(config: &AppConfig, query: &ListQuery) -> Result<i32> {
    let (bugs, taxonomy) = load_dataset(&config.data)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);

    if format == ReportFormat::Tui {
        let mut app = BrowserApp::new(config);
        let ctrl = app.controller_mut();
        ctrl.set_bugs(bugs);
        ctrl.set_taxonomy(taxonomy);
        apply_filters(ctrl, &query.filters);
        app.skip_welcome();
        app.sync();
        run_browser_tui(&mut app, None).context("Terminal UI failed")?;
        return Ok(exit_codes::SUCCESS);
    }

    let ctrl = build_controller(config, bugs, taxonomy, &query.filters);
    let report = ListReport::from_controller(&ctrl);
    tracing::info!(
        "{} of {} bugs match {} filter(s)",
        report.bugs.len(),
        report.total,
        report.filters.len()
    );

    let report_config = ReportConfig {
        columns: config.browse.columns.clone(),
        max_items: query.limit,
        ..ReportConfig::default()
    };
    let reporter = create_reporter_with_options(format, should_use_color(config.output.no_color));
    let content = reporter
        .generate_list_report(&report, &report_config)
        .context("Failed to generate list report")?;
    write_output(&content, &target, false)?;

    if report.bugs.is_empty() {
        Ok(exit_codes::NO_MATCH)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn build_controller(
    config: &AppConfig,
    bugs: Vec<BugRecord>,
    taxonomy: Taxonomy,
    filters: &[String],
) -> ViewController {
    let mut ctrl =
        ViewController::with_settings(config.browse.sort_spec(), config.browse.match_mode);
    ctrl.set_bugs(bugs);
    ctrl.set_taxonomy(taxonomy);
    apply_filters(&mut ctrl, filters);
    ctrl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::MatchMode;
    use crate::model::Label;

    fn dataset() -> (Vec<BugRecord>, Taxonomy) {
        let bugs = vec![
            BugRecord::new("Lang", "1").with_field("wrapsIf", true),
            BugRecord::new("Chart", "4")
                .with_field("wrapsIf", true)
                .with_field("condBranIfAdd", true),
            BugRecord::new("Math", "2").with_field("condBranIfAdd", true),
        ];
        let mut taxonomy = Taxonomy::new();
        taxonomy.insert("Repair Patterns", "Wraps", "wrapsIf", Label::new("Wraps-with if"));
        taxonomy.insert(
            "Repair Actions",
            "Conditional",
            "condBranIfAdd",
            Label::new("If addition"),
        );
        (bugs, taxonomy)
    }

    #[test]
    fn test_build_controller_applies_filters_and_sort() {
        let (bugs, taxonomy) = dataset();
        let ctrl = build_controller(
            &AppConfig::default(),
            bugs,
            taxonomy,
            &["wrapsIf".to_string()],
        );
        let projects: Vec<_> = ctrl.visible().map(|b| b.project.as_str()).collect();
        assert_eq!(projects, ["Chart", "Lang"]);
    }

    #[test]
    fn test_build_controller_any_mode() {
        let (bugs, taxonomy) = dataset();
        let mut config = AppConfig::default();
        config.browse.match_mode = MatchMode::Any;
        let ctrl = build_controller(
            &config,
            bugs,
            taxonomy,
            &["wrapsIf".to_string(), "condBranIfAdd".to_string()],
        );
        assert_eq!(ctrl.visible_len(), 3);
    }

    #[test]
    fn test_unknown_filter_key_matches_nothing() {
        let (bugs, taxonomy) = dataset();
        let ctrl =
            build_controller(&AppConfig::default(), bugs, taxonomy, &["nope".to_string()]);
        assert_eq!(ctrl.visible_len(), 0);
    }
}
