//! Loading of the two data documents.
//!
//! Each document comes from a local path or, with the `remote` feature, an
//! `http(s)` URL. The CLI loads synchronously; the TUI starts both loads on
//! background threads with [`spawn_loads`] and receives the results as
//! [`LoadEvent`]s on its event channel.

use crate::error::{BrowserError, ErrorContext, LoadErrorKind, Result};
use crate::model::{BugRecord, Taxonomy};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Where a document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret `s` as a URL when it has an `http(s)://` scheme, else as a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::File(PathBuf::from(s))
        }
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Options for reading documents.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Timeout for remote requests
    pub timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of one background load.
#[derive(Debug)]
pub enum LoadEvent {
    Bugs(Result<Vec<BugRecord>>),
    Taxonomy(Result<Taxonomy>),
}

/// Read the raw text of a document.
pub fn fetch_text(source: &DataSource, options: &LoadOptions) -> Result<String> {
    match source {
        DataSource::File(path) => {
            std::fs::read_to_string(path).map_err(|e| BrowserError::io(path, e))
        }
        DataSource::Url(url) => fetch_remote(url, options),
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str, options: &LoadOptions) -> Result<String> {
    use reqwest::blocking::Client;

    let network_error = |msg: &str, err: reqwest::Error| {
        BrowserError::load(msg, LoadErrorKind::Network(err.to_string()))
    };

    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| network_error("Failed to create HTTP client", e))?;

    tracing::debug!(url, "fetching document");
    let response = client
        .get(url)
        .send()
        .map_err(|e| network_error("Request failed", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BrowserError::load(
            "Fetching document",
            LoadErrorKind::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            },
        ));
    }

    response
        .text()
        .map_err(|e| network_error("Reading response body", e))
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str, _options: &LoadOptions) -> Result<String> {
    Err(BrowserError::load(
        "Fetching document",
        LoadErrorKind::RemoteDisabled(url.to_string()),
    ))
}

/// Parse the bug list document: a JSON array of records.
///
/// Every `(project, commit)` pair must be unique.
pub fn parse_bugs(text: &str) -> Result<Vec<BugRecord>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(BrowserError::load(
            "bug list",
            LoadErrorKind::UnexpectedShape("expected an array of bug records".to_string()),
        ));
    };

    let bugs = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<BugRecord>(item).map_err(|e| {
                BrowserError::load(
                    format!("bug record #{i}"),
                    LoadErrorKind::UnexpectedShape(e.to_string()),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(bugs.len());
    for bug in &bugs {
        if !seen.insert((bug.project.as_str(), bug.commit.as_str())) {
            return Err(BrowserError::load(
                "bug list",
                LoadErrorKind::DuplicateRecord {
                    project: bug.project.clone(),
                    commit: bug.commit.clone(),
                },
            ));
        }
    }

    Ok(bugs)
}

/// Parse the classification document: a nested JSON object.
pub fn parse_taxonomy(text: &str) -> Result<Taxonomy> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(BrowserError::load(
            "classification",
            LoadErrorKind::UnexpectedShape("expected an object of categories".to_string()),
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        BrowserError::load(
            "classification",
            LoadErrorKind::UnexpectedShape(e.to_string()),
        )
    })
}

/// Read and parse the bug list.
pub fn load_bugs(source: &DataSource, options: &LoadOptions) -> Result<Vec<BugRecord>> {
    let text = fetch_text(source, options)?;
    let bugs = parse_bugs(&text).with_context(|| format!("reading {source}"))?;
    tracing::info!(count = bugs.len(), %source, "loaded bug records");
    Ok(bugs)
}

/// Read and parse the classification taxonomy.
pub fn load_taxonomy(source: &DataSource, options: &LoadOptions) -> Result<Taxonomy> {
    let text = fetch_text(source, options)?;
    let taxonomy = parse_taxonomy(&text).with_context(|| format!("reading {source}"))?;
    tracing::info!(keys = taxonomy.len(), %source, "loaded classification");
    Ok(taxonomy)
}

/// Start both loads on their own threads.
///
/// Each thread sends exactly one event on `tx`; arrival order is not fixed.
/// A closed receiver is not an error, the result is dropped.
pub fn spawn_loads<E>(
    bugs: DataSource,
    taxonomy: DataSource,
    options: &LoadOptions,
    tx: &mpsc::Sender<E>,
) -> [JoinHandle<()>; 2]
where
    E: From<LoadEvent> + Send + 'static,
{
    let bugs_handle = {
        let tx = tx.clone();
        let options = options.clone();
        thread::spawn(move || {
            let result = load_bugs(&bugs, &options);
            if let Err(e) = &result {
                tracing::warn!("bug list load failed: {e}");
            }
            let _ = tx.send(LoadEvent::Bugs(result).into());
        })
    };

    let taxonomy_handle = {
        let tx = tx.clone();
        let options = options.clone();
        thread::spawn(move || {
            let result = load_taxonomy(&taxonomy, &options);
            if let Err(e) = &result {
                tracing::warn!("classification load failed: {e}");
            }
            let _ = tx.send(LoadEvent::Taxonomy(result).into());
        })
    };

    [bugs_handle, taxonomy_handle]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_parse() {
        assert!(DataSource::parse("https://example.org/bugs.json").is_remote());
        assert!(DataSource::parse("HTTP://example.org/bugs.json").is_remote());
        assert_eq!(
            DataSource::parse("data/bugs.json"),
            DataSource::File(PathBuf::from("data/bugs.json"))
        );
    }

    #[test]
    fn test_parse_bugs() {
        let bugs = parse_bugs(
            r#"[{"project": "Chart", "commit": 1, "assignAdd": true},
                {"project": "Lang", "commit": "2", "patch": "--- a\n+++ b\n"}]"#,
        )
        .expect("valid bug list");
        assert_eq!(bugs.len(), 2);
        assert!(bugs[0].flag("assignAdd"));
        assert_eq!(bugs[1].commit, "2");
    }

    #[test]
    fn test_parse_bugs_rejects_duplicates() {
        let err = parse_bugs(
            r#"[{"project": "Chart", "commit": 1}, {"project": "Chart", "commit": "1"}]"#,
        )
        .expect_err("duplicate must fail");
        assert!(matches!(
            err,
            BrowserError::Load {
                source: LoadErrorKind::DuplicateRecord { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_parse_bugs_rejects_wrong_shape() {
        assert!(parse_bugs(r#"{"project": "Chart"}"#).is_err());
        assert!(parse_bugs(r#"[{"commit": 1}]"#).is_err());
        assert!(parse_bugs("not json").is_err());
    }

    #[test]
    fn test_parse_taxonomy_requires_object() {
        assert!(parse_taxonomy("[]").is_err());
        let tax = parse_taxonomy(r#"{"Repair Actions": {"Loop": {"loopAdd": {"name": "Loop addition"}}}}"#)
            .expect("valid taxonomy");
        assert_eq!(tax.label("loopAdd"), "Loop addition");
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"project": "Math", "commit": 5}}]"#).expect("write");

        let source = DataSource::from(file.path());
        let bugs = load_bugs(&source, &LoadOptions::default()).expect("load");
        assert_eq!(bugs[0].project, "Math");

        let missing = DataSource::parse("/nonexistent/bugs.json");
        assert!(matches!(
            load_bugs(&missing, &LoadOptions::default()),
            Err(BrowserError::Io { .. })
        ));
    }

    #[test]
    fn test_spawn_loads_sends_both_events() {
        let mut bugs = tempfile::NamedTempFile::new().expect("temp file");
        write!(bugs, r#"[{{"project": "A", "commit": 1}}]"#).expect("write");

        let (tx, rx) = mpsc::channel::<LoadEvent>();
        let handles = spawn_loads(
            DataSource::from(bugs.path()),
            DataSource::parse("/nonexistent/classification.json"),
            &LoadOptions::default(),
            &tx,
        );
        for handle in handles {
            handle.join().expect("loader thread");
        }

        let events: Vec<LoadEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .any(|e| matches!(e, LoadEvent::Bugs(Ok(b)) if b.len() == 1)));
        assert!(events
            .iter()
            .any(|e| matches!(e, LoadEvent::Taxonomy(Err(_)))));
    }
}
