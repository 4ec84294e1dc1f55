//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod browse;
mod labels;
mod list;
mod output;
mod show;

pub use browse::run_browse;
pub use labels::{run_labels, LabelsQuery};
pub use list::{apply_filters, run_list, ListQuery};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use show::run_show;

use crate::config::DataConfig;
use crate::loader::{load_bugs, load_taxonomy};
use crate::model::{BugRecord, Taxonomy};
use anyhow::{Context, Result};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// No bug matched the query
    pub const NO_MATCH: i32 = 1;
    /// The requested bug does not exist
    pub const NOT_FOUND: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Load both documents on the calling thread.
///
/// The bug list is required. A classification that fails to load is logged
/// and replaced by an empty taxonomy, so labels fall back to raw keys.
pub(crate) fn load_dataset(data: &DataConfig) -> Result<(Vec<BugRecord>, Taxonomy)> {
    let options = data.load_options();
    let bugs = load_bugs(&data.bugs_source(), &options)
        .with_context(|| format!("Failed to load bugs from {}", data.bugs))?;
    let taxonomy = match load_taxonomy(&data.classification_source(), &options) {
        Ok(taxonomy) => taxonomy,
        Err(e) => {
            tracing::warn!("Classification unavailable, showing raw keys: {e}");
            Taxonomy::new()
        }
    };
    Ok((bugs, taxonomy))
}
