//! Integration tests for defects-browser
//!
//! These tests load the JSON fixtures and drive the view controller, the
//! report generators and the CLI handlers end to end.

use defects_browser::{
    browser::{DetailState, MatchMode, Route, SortSpec, ViewController, ViewEvent},
    loader::{
        load_bugs, load_taxonomy, parse_bugs, spawn_loads, DataSource, LoadEvent, LoadOptions,
    },
    model::{BugRecord, FieldValue, Taxonomy},
};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn fixture_bugs() -> Vec<BugRecord> {
    load_bugs(
        &DataSource::from(fixture_path("bugs.json").as_path()),
        &LoadOptions::default(),
    )
    .expect("Failed to load bug fixture")
}

fn fixture_taxonomy() -> Taxonomy {
    load_taxonomy(
        &DataSource::from(fixture_path("classification.json").as_path()),
        &LoadOptions::default(),
    )
    .expect("Failed to load classification fixture")
}

fn loaded_controller() -> ViewController {
    let mut ctrl = ViewController::new();
    ctrl.set_bugs(fixture_bugs());
    ctrl.set_taxonomy(fixture_taxonomy());
    ctrl.drain_events();
    ctrl
}

fn visible_ids(ctrl: &ViewController) -> Vec<String> {
    ctrl.visible()
        .map(|b| format!("{}/{}", b.project, b.commit))
        .collect()
}

// ============================================================================
// Loader Tests
// ============================================================================

mod loader_tests {
    use super::*;

    #[test]
    fn test_load_bug_fixture() {
        let bugs = fixture_bugs();
        assert_eq!(bugs.len(), 4);
        assert_eq!(bugs[0].project, "jackrabbit-oak");
        // null patch reads as empty
        assert!(bugs[3].patch.is_empty());
        assert_eq!(bugs[2].field("metrics.lines"), FieldValue::Number(21.0));
        assert!(bugs[0].flag("wrapsIf"));
        assert!(!bugs[0].flag("Nopol"));
    }

    #[test]
    fn test_load_taxonomy_fixture() {
        let taxonomy = fixture_taxonomy();
        assert_eq!(taxonomy.len(), 6);
        assert_eq!(
            taxonomy.label("condBranIfAdd"),
            "Conditional (if) branch addition"
        );
        assert_eq!(taxonomy.label("constChange"), "Constant change");
        assert_eq!(taxonomy.label("notAKey"), "notAKey");
        assert_eq!(taxonomy.repair_label("Nopol"), Some("Nopol"));
        assert_eq!(taxonomy.repair_label("wrapsIf"), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_bugs(
            &DataSource::from(fixture_path("does-not-exist.json").as_path()),
            &LoadOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_records_are_rejected() {
        let text = r#"[{"project": "A", "commit": "1"}, {"project": "A", "commit": 1}]"#;
        assert!(parse_bugs(text).is_err());
    }

    #[test]
    fn test_spawn_loads_delivers_both_documents() {
        let (tx, rx) = std::sync::mpsc::channel::<LoadEvent>();
        let handles = spawn_loads(
            DataSource::from(fixture_path("bugs.json").as_path()),
            DataSource::from(fixture_path("classification.json").as_path()),
            &LoadOptions::default(),
            &tx,
        );
        drop(tx);
        for handle in handles {
            handle.join().expect("loader thread panicked");
        }

        let mut bugs = None;
        let mut taxonomy = None;
        for event in rx {
            match event {
                LoadEvent::Bugs(result) => bugs = Some(result.expect("bugs")),
                LoadEvent::Taxonomy(result) => taxonomy = Some(result.expect("taxonomy")),
            }
        }
        assert_eq!(bugs.map(|b| b.len()), Some(4));
        assert_eq!(taxonomy.map(|t| t.len()), Some(6));
    }
}

// ============================================================================
// Controller Tests
// ============================================================================

mod controller_tests {
    use super::*;

    #[test]
    fn test_default_sort_keeps_load_order_for_ties() {
        let ctrl = loaded_controller();
        assert_eq!(
            visible_ids(&ctrl),
            [
                "accumulo/b007b22e",
                "accumulo/efef09b0",
                "flink/6138a80f",
                "jackrabbit-oak/4d23d784"
            ]
        );
    }

    #[test]
    fn test_filters_all_and_any() {
        let mut ctrl = loaded_controller();
        ctrl.toggle_filter("wrapsIf");
        ctrl.toggle_filter("condBranIfAdd");
        assert_eq!(visible_ids(&ctrl), ["jackrabbit-oak/4d23d784"]);

        ctrl.set_match_mode(MatchMode::Any);
        assert_eq!(
            visible_ids(&ctrl),
            [
                "accumulo/efef09b0",
                "flink/6138a80f",
                "jackrabbit-oak/4d23d784"
            ]
        );

        ctrl.clear_filters();
        assert_eq!(ctrl.visible_len(), 4);
    }

    #[test]
    fn test_sort_by_metric_column() {
        let mut ctrl = loaded_controller();
        ctrl.sort_by(["metrics.lines"]);
        assert_eq!(
            visible_ids(&ctrl),
            [
                "accumulo/b007b22e",
                "jackrabbit-oak/4d23d784",
                "accumulo/efef09b0",
                "flink/6138a80f"
            ]
        );

        ctrl.sort_by(["metrics.lines"]);
        assert_eq!(
            ctrl.sort_spec(),
            &SortSpec::new(["metrics.lines"]).reversed(true)
        );
        assert_eq!(visible_ids(&ctrl)[0], "flink/6138a80f");
    }

    #[test]
    fn test_project_column_toggles_with_any_secondary_field() {
        let mut ctrl = loaded_controller();
        ctrl.sort_by(["project"]);
        assert!(ctrl.sort_spec().reverse);
        assert_eq!(visible_ids(&ctrl)[0], "jackrabbit-oak/4d23d784");
    }

    #[test]
    fn test_open_step_and_close() {
        let mut ctrl = loaded_controller();
        assert!(ctrl.open_position(0));
        assert_eq!(ctrl.route(), &Route::bug("accumulo", "b007b22e"));

        ctrl.previous_bug();
        assert_eq!(ctrl.detail(), DetailState::Open(3));
        assert_eq!(ctrl.route(), &Route::bug("jackrabbit-oak", "4d23d784"));

        ctrl.next_bug();
        assert_eq!(ctrl.detail(), DetailState::Open(0));

        ctrl.close();
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert_eq!(ctrl.route(), &Route::List);
        assert!(!ctrl.open_position(10));
    }

    #[test]
    fn test_filter_hiding_open_bug_closes_detail_until_it_matches_again() {
        let mut ctrl = loaded_controller();
        ctrl.navigate(Route::bug("accumulo", "b007b22e"));
        ctrl.drain_events();

        ctrl.toggle_filter("wrapsIf");
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert!(ctrl.drain_events().contains(&ViewEvent::Closed));
        assert_eq!(ctrl.route(), &Route::bug("accumulo", "b007b22e"));

        ctrl.toggle_filter("wrapsIf");
        assert_eq!(ctrl.detail(), DetailState::Open(0));
    }

    #[test]
    fn test_unknown_route_closes_detail() {
        let mut ctrl = loaded_controller();
        ctrl.navigate(Route::parse("/bug/Foo/99").expect("valid route"));
        assert_eq!(ctrl.detail(), DetailState::Closed);
        assert!(ctrl.open_bug().is_none());
    }

    #[test]
    fn test_route_before_data_resolves_on_load() {
        let mut ctrl = ViewController::new();
        ctrl.navigate(Route::bug("flink", "6138a80f"));
        assert_eq!(ctrl.detail(), DetailState::Closed);

        ctrl.set_bugs(fixture_bugs());
        assert_eq!(ctrl.detail(), DetailState::Open(2));
        assert!(ctrl.drain_events().contains(&ViewEvent::Opened(2)));
    }

    #[test]
    fn test_back_restores_previous_bug() {
        let mut ctrl = loaded_controller();
        ctrl.open_position(1);
        ctrl.close();
        assert!(ctrl.back());
        assert_eq!(ctrl.detail(), DetailState::Open(1));
    }

    #[test]
    fn test_count_bugs() {
        let ctrl = loaded_controller();
        assert_eq!(ctrl.count_bugs("wrapsIf"), 2);
        assert_eq!(ctrl.count_bugs("Nopol"), 1);
        assert_eq!(ctrl.count_bugs("singleLine"), 0);
    }

    #[test]
    fn test_classify_open_bug() {
        let mut ctrl = loaded_controller();
        ctrl.navigate(Route::bug("accumulo", "efef09b0"));
        let bug = ctrl.open_bug().expect("open bug");
        let groups = ctrl.taxonomy().classify(bug);
        let categories: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(categories, ["Repair Actions", "Other"]);
        assert_eq!(groups[1].flags, [("", "undocumentedFlag", "undocumentedFlag")]);
    }
}

// ============================================================================
// Report Tests
// ============================================================================

mod report_tests {
    use super::*;
    use defects_browser::reports::{
        create_reporter_with_options, ListReport, ReportConfig, ReportFormat,
    };

    #[test]
    fn test_summary_list_report() {
        let mut ctrl = loaded_controller();
        ctrl.toggle_filter("wrapsIf");
        let report = ListReport::from_controller(&ctrl);
        let text = create_reporter_with_options(ReportFormat::Summary, false)
            .generate_list_report(&report, &ReportConfig::default())
            .expect("summary");

        assert!(text.contains("2 of 4 bugs"));
        assert!(text.contains("Wraps-with if statement"));
        assert!(text.contains("flink"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_json_list_report_respects_limit() {
        let ctrl = loaded_controller();
        let report = ListReport::from_controller(&ctrl);
        let config = ReportConfig {
            max_items: Some(2),
            ..ReportConfig::default()
        };
        let json = create_reporter_with_options(ReportFormat::Json, false)
            .generate_list_report(&report, &config)
            .expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["total"], 4);
        assert_eq!(value["shown"], 4);
        assert_eq!(value["bugs"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["bugs"][0]["project"], "accumulo");
    }

    #[test]
    fn test_json_bug_report_labels() {
        let ctrl = loaded_controller();
        let taxonomy = ctrl.taxonomy();
        let bug = &ctrl.bugs()[0];
        let json = create_reporter_with_options(ReportFormat::Json, false)
            .generate_bug_report(bug, taxonomy, &ReportConfig::default())
            .expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["commit"], "4d23d784");
        assert_eq!(
            value["labels"]["Repair Patterns"][0]["label"],
            "Wraps-with if statement"
        );
        assert!(value["patch"].as_str().is_some_and(|p| p.contains("@@")));
    }
}

// ============================================================================
// CLI Handler Tests
// ============================================================================

mod cli_tests {
    use super::*;
    use defects_browser::cli::{
        exit_codes, run_labels, run_list, run_show, LabelsQuery, ListQuery,
    };
    use defects_browser::config::AppConfig;
    use defects_browser::reports::ReportFormat;
    use tempfile::TempDir;

    fn config(out: &Path, format: ReportFormat) -> AppConfig {
        let mut config = AppConfig::default();
        config.data.bugs = fixture_path("bugs.json").display().to_string();
        config.data.classification = fixture_path("classification.json")
            .display()
            .to_string();
        config.output.format = format;
        config.output.file = Some(out.to_path_buf());
        config.output.no_color = true;
        config
    }

    #[test]
    fn test_list_writes_json() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("list.json");
        let query = ListQuery {
            filters: vec!["condBranIfAdd".to_string()],
            limit: None,
        };

        let code = run_list(&config(&out, ReportFormat::Json), &query).expect("list");
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
        assert_eq!(value["shown"], 2);
        assert_eq!(value["filters"][0]["label"], "Conditional (if) branch addition");
    }

    #[test]
    fn test_list_without_matches_exits_one() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("list.txt");
        let query = ListQuery {
            filters: vec!["singleLine".to_string()],
            limit: None,
        };
        let code = run_list(&config(&out, ReportFormat::Summary), &query).expect("list");
        assert_eq!(code, exit_codes::NO_MATCH);
        assert!(std::fs::read_to_string(&out)
            .expect("read")
            .contains("No bugs match"));
    }

    #[test]
    fn test_list_with_missing_bugs_file_fails() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = config(&dir.path().join("out"), ReportFormat::Json);
        config.data.bugs = dir.path().join("missing.json").display().to_string();
        assert!(run_list(&config, &ListQuery::default()).is_err());
    }

    #[test]
    fn test_show_table_report() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("bug.txt");
        let code = run_show(
            &config(&out, ReportFormat::Table),
            &Route::bug("accumulo", "b007b22e"),
            true,
        )
        .expect("show");
        assert_eq!(code, exit_codes::SUCCESS);
        let text = std::fs::read_to_string(&out).expect("read");
        assert!(text.contains("b007b22e"));
    }

    #[test]
    fn test_show_missing_bug() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("bug.txt");
        let code = run_show(
            &config(&out, ReportFormat::Summary),
            &Route::bug("Foo", "99"),
            true,
        )
        .expect("show");
        assert_eq!(code, exit_codes::NOT_FOUND);
        assert!(!out.exists());
    }

    #[test]
    fn test_labels_with_counts() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("labels.json");
        let query = LabelsQuery {
            category: Some("Repair Patterns".to_string()),
            counts: true,
        };
        let code = run_labels(&config(&out, ReportFormat::Json), &query).expect("labels");
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
        let rows = value.as_array().expect("array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["key"], "wrapsIf");
        assert_eq!(rows[0]["count"], 2);
    }

    #[test]
    fn test_labels_unknown_category() {
        let dir = TempDir::new().expect("temp dir");
        let out = dir.path().join("labels.txt");
        let query = LabelsQuery {
            category: Some("Nope".to_string()),
            counts: false,
        };
        let code = run_labels(&config(&out, ReportFormat::Summary), &query).expect("labels");
        assert_eq!(code, exit_codes::NO_MATCH);
    }
}
