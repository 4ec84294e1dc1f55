//! Unified error types for defects-browser.
//!
//! Lookups that miss (unknown classification keys, routes that match no bug)
//! are not errors; they degrade to fallback values. This module covers the
//! genuinely fallible edges: reading the data documents, parsing routes and
//! validating configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for defects-browser operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BrowserError {
    /// Errors while loading one of the data documents
    #[error("Failed to load data: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// A route string that is neither `/` nor `/bug/:project/:id`
    #[error("Invalid route '{route}': {reason}")]
    Route { route: String, reason: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Unexpected document shape: {0}")]
    UnexpectedShape(String),

    #[error("Duplicate bug record: {project}/{commit}")]
    DuplicateRecord { project: String, commit: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Remote sources are not supported in this build: {0}")]
    RemoteDisabled(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for defects-browser operations
pub type Result<T> = std::result::Result<T, BrowserError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl BrowserError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create a route error
    pub fn route(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Route {
            route: route.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for BrowserError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        Self::load(
            "JSON deserialization",
            LoadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are prepended to the existing context, so a chain reads
/// from the outermost operation inwards:
///
/// ```ignore
/// use defects_browser::error::ErrorContext;
///
/// let text = std::fs::read_to_string(path).context("reading bug list")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<BrowserError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: BrowserError, new_ctx: &str) -> BrowserError {
    match err {
        BrowserError::Load {
            context: existing,
            source,
        } => BrowserError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BrowserError::Route { route, reason } => BrowserError::Route {
            route,
            reason: chain_context(new_ctx, &reason),
        },
        BrowserError::Io {
            path,
            message,
            source,
        } => BrowserError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        BrowserError::Config(msg) => BrowserError::Config(chain_context(new_ctx, &msg)),
        BrowserError::Validation(msg) => BrowserError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
