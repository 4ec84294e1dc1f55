//! Show command handler.
//!
//! Implements the `show` subcommand: one bug's classification and patch,
//! addressed by route.

use super::{
    auto_detect_format, exit_codes, load_dataset, should_use_color, write_output, OutputTarget,
};
use crate::browser::{resolve_index, Route};
use crate::config::AppConfig;
use crate::reports::{create_reporter_with_options, ReportConfig, ReportFormat};
use crate::tui::{run_browser_tui, BrowserApp};
use anyhow::{bail, Context, Result};

/// Run the show command for a `/bug/:project/:id` route.
pub fn run_show(config: &AppConfig, route: &Route, include_patch: bool) -> Result<i32> {
    let Route::Bug { project, id } = route else {
        bail!("Route {route} does not address a bug; expected /bug/<project>/<id>");
    };

    let (bugs, taxonomy) = load_dataset(&config.data)?;
    let Some(index) = resolve_index(&bugs, project, id) else {
        eprintln!("No bug {project} {id} in {}", config.data.bugs);
        return Ok(exit_codes::NOT_FOUND);
    };

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);

    if format == ReportFormat::Tui {
        let mut app = BrowserApp::new(config);
        let ctrl = app.controller_mut();
        ctrl.set_bugs(bugs);
        ctrl.set_taxonomy(taxonomy);
        app.start_at(route.clone());
        run_browser_tui(&mut app, None).context("Terminal UI failed")?;
        return Ok(exit_codes::SUCCESS);
    }

    let report_config = ReportConfig {
        include_patch,
        ..ReportConfig::default()
    };
    let reporter = create_reporter_with_options(format, should_use_color(config.output.no_color));
    let content = reporter
        .generate_bug_report(&bugs[index], &taxonomy, &report_config)
        .context("Failed to generate bug report")?;
    write_output(&content, &target, false)?;

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> AppConfig {
        let bugs = dir.path().join("bugs.json");
        let classification = dir.path().join("classification.json");
        std::fs::write(
            &bugs,
            r#"[{"project": "Closure", "commit": "12", "patch": "+x\n", "wrapsIf": true}]"#,
        )
        .expect("write bugs");
        std::fs::write(&classification, "{}").expect("write classification");

        let mut config = AppConfig::default();
        config.data = DataConfig {
            bugs: bugs.display().to_string(),
            classification: classification.display().to_string(),
            ..DataConfig::default()
        };
        config.output.format = ReportFormat::Json;
        config.output.file = Some(dir.path().join("out.json"));
        config
    }

    #[test]
    fn test_show_writes_report() {
        let dir = TempDir::new().expect("temp dir");
        let config = config_for(&dir);
        let code = run_show(&config, &Route::bug("Closure", "12"), true).expect("show");
        assert_eq!(code, exit_codes::SUCCESS);

        let out = std::fs::read_to_string(dir.path().join("out.json")).expect("read");
        assert!(out.contains("Closure"));
    }

    #[test]
    fn test_show_unknown_bug_is_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let config = config_for(&dir);
        let code = run_show(&config, &Route::bug("Foo", "99"), false).expect("show");
        assert_eq!(code, exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_show_rejects_list_route() {
        let config = AppConfig::default();
        assert!(run_show(&config, &Route::List, false).is_err());
    }
}
