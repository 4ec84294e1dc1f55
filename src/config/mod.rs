//! Configuration module for defects-browser.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.defects-browser.yaml` file in your project root or
//! `~/.config/defects-browser/`:
//!
//! ```yaml
//! data:
//!   bugs: https://example.org/data/bugs.json
//!   classification: data/classification.json
//! browse:
//!   match_mode: any
//!   show_welcome: false
//! tui:
//!   theme: light
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{AppConfig, BrowseConfig, ColumnConfig, DataConfig, OutputConfig, TuiConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_config_path, discover_config_file, generate_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// It documents every option of `.defects-browser.yaml` and can be used by
/// editors for validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
