//! Browse command handler.
//!
//! Implements the `browse` subcommand: the interactive browser, loading both
//! documents in the background.

use crate::browser::Route;
use crate::config::AppConfig;
use crate::tui::{run_browser_tui, BrowserApp};
use anyhow::{Context, Result};

/// Run the browse command, optionally starting at a deep link.
pub fn run_browse(config: &AppConfig, route: Option<&str>) -> Result<i32> {
    let mut app = BrowserApp::new(config);

    if let Some(route) = route {
        let route = Route::parse(route).context("Invalid --route")?;
        tracing::debug!(%route, "starting at deep link");
        app.start_at(route);
    }

    run_browser_tui(&mut app, Some(&config.data)).context("Terminal UI failed")?;
    Ok(super::exit_codes::SUCCESS)
}
