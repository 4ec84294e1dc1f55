//! Configuration validation for defects-browser.

use super::types::{AppConfig, BrowseConfig, DataConfig, OutputConfig, TuiConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.data.validate());
        errors.extend(self.browse.validate());
        errors.extend(self.output.validate());
        errors.extend(self.tui.validate());
        errors
    }
}

impl Validatable for DataConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.bugs.trim().is_empty() {
            errors.push(ConfigError::new("data.bugs", "Bug list location is empty"));
        }
        if self.classification.trim().is_empty() {
            errors.push(ConfigError::new(
                "data.classification",
                "Classification location is empty",
            ));
        }
        if !(1..=600).contains(&self.timeout_secs) {
            errors.push(ConfigError::new(
                "data.timeout_secs",
                format!(
                    "Timeout must be between 1 and 600 seconds, got {}",
                    self.timeout_secs
                ),
            ));
        }
        errors
    }
}

impl Validatable for BrowseConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.sort.is_empty() {
            errors.push(ConfigError::new("browse.sort", "At least one sort field is required"));
        } else if self.sort.iter().any(|f| f.trim().is_empty()) {
            errors.push(ConfigError::new("browse.sort", "Sort fields must not be empty"));
        }

        if self.columns.is_empty() {
            errors.push(ConfigError::new("browse.columns", "At least one column is required"));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if column.sort.is_empty() || column.field().trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("browse.columns[{i}].sort"),
                    format!("Column '{}' has no sort field", column.title),
                ));
            }
            if column.width == 0 {
                errors.push(ConfigError::new(
                    format!("browse.columns[{i}].width"),
                    "Column width must be at least 1",
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for TuiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let valid_themes = ["dark", "light", "high-contrast"];
        if !valid_themes.contains(&self.theme.as_str()) {
            errors.push(ConfigError::new(
                "tui.theme",
                format!(
                    "Invalid theme '{}'. Valid options: {}",
                    self.theme,
                    valid_themes.join(", ")
                ),
            ));
        }

        errors
    }
}
