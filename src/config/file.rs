//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".defects-browser.yaml",
    ".defects-browser.yml",
    "defects-browser.yaml",
    "defects-browser.yml",
];

/// Directory name under the user config directory.
const CONFIG_DIR_NAME: &str = "defects-browser";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/defects-browser/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    let search_dirs = [
        cwd.clone(),
        cwd.as_deref().and_then(find_git_root),
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME)),
        dirs::home_dir(),
    ];

    search_dirs
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Path `config init --global` writes to.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(CONFIG_FILE_NAMES[0]),
        |d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAMES[2]),
    )
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// This is how CLI arguments are layered over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Data sources
        if other.data.bugs != defaults.data.bugs {
            self.data.bugs.clone_from(&other.data.bugs);
        }
        if other.data.classification != defaults.data.classification {
            self.data.classification.clone_from(&other.data.classification);
        }
        if other.data.timeout_secs != defaults.data.timeout_secs {
            self.data.timeout_secs = other.data.timeout_secs;
        }

        // Browse settings
        if other.browse.sort != defaults.browse.sort {
            self.browse.sort.clone_from(&other.browse.sort);
        }
        if other.browse.reverse {
            self.browse.reverse = true;
        }
        if other.browse.match_mode != defaults.browse.match_mode {
            self.browse.match_mode = other.browse.match_mode;
        }
        if !other.browse.show_welcome {
            self.browse.show_welcome = false;
        }
        if other.browse.columns != defaults.browse.columns {
            self.browse.columns.clone_from(&other.browse.columns);
        }

        // Output config - only override if explicitly set
        if other.output.format != ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // TUI config
        if other.tui.theme != defaults.tui.theme {
            self.tui.theme.clone_from(&other.tui.theme);
        }
        if !other.tui.mouse_enabled {
            self.tui.mouse_enabled = false;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# defects-browser configuration
# Place this file at .defects-browser.yaml in your project root
# or ~/.config/defects-browser/defects-browser.yaml.
# CLI arguments always override file settings.

{}",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::MatchMode;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().expect("temp dir");
        let config_path = tmp.path().join(".defects-browser.yaml");
        std::fs::write(&config_path, "browse:\n  match_mode: any\n").expect("write");

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().expect("temp dir");
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_git_root_walks_up() {
        let tmp = TempDir::new().expect("temp dir");
        std::fs::create_dir(tmp.path().join(".git")).expect("mkdir .git");
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir nested");

        assert_eq!(find_git_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().expect("temp dir");
        let config_path = tmp.path().join("config.yaml");

        let yaml = r#"
data:
  bugs: https://example.org/bugs.json
  timeout_secs: 10
browse:
  sort: [commit]
  show_welcome: false
tui:
  theme: light
"#;
        std::fs::write(&config_path, yaml).expect("write");

        let config = load_config_file(&config_path).expect("load");
        assert_eq!(config.data.bugs, "https://example.org/bugs.json");
        assert_eq!(config.data.timeout_secs, 10);
        assert_eq!(config.browse.sort, ["commit"]);
        assert!(!config.browse.show_welcome);
        assert_eq!(config.tui.theme, "light");
    }

    #[test]
    fn test_load_config_file_errors() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));

        let tmp = TempDir::new().expect("temp dir");
        let bad = tmp.path().join("bad.yaml");
        std::fs::write(&bad, "browse: [not, a, map]\n").expect("write");
        assert!(matches!(load_config_file(&bad), Err(ConfigFileError::Parse(_))));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        base.tui.theme = "light".to_string();

        let mut overrides = AppConfig::default();
        overrides.data.bugs = "other.json".to_string();
        overrides.browse.match_mode = MatchMode::Any;
        overrides.output.format = ReportFormat::Json;

        base.merge(&overrides);

        assert_eq!(base.data.bugs, "other.json");
        assert_eq!(base.browse.match_mode, MatchMode::Any);
        assert_eq!(base.output.format, ReportFormat::Json);
        // untouched by a default override
        assert_eq!(base.tui.theme, "light");
    }

    #[test]
    fn test_generate_example_config_round_trips() {
        let example = generate_example_config();
        assert!(example.contains("browse:"));
        let parsed: AppConfig = serde_yaml_ng::from_str(&example).expect("example parses");
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().expect("temp dir");
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "tui:\n  theme: dark\n").expect("write");

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
