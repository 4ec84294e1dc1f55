//! Route model: `/` for the list and `/bug/:project/:id` for one bug.

use crate::error::{BrowserError, Result};
use crate::model::BugRecord;
use std::fmt;
use std::str::FromStr;

/// A location in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// The bug list
    #[default]
    List,
    /// The detail view of one bug
    Bug { project: String, id: String },
}

impl Route {
    pub fn bug(project: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Bug {
            project: project.into(),
            id: id.into(),
        }
    }

    /// Route of a record's detail view.
    #[must_use]
    pub fn for_record(bug: &BugRecord) -> Self {
        Self::bug(bug.project.clone(), bug.commit.clone())
    }

    /// Parse a path. A leading `#` or `#!` (hash routing) is accepted.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path
            .trim()
            .trim_start_matches('#')
            .trim_start_matches('!');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Self::List),
            ["bug", project, id] => Ok(Self::bug(*project, *id)),
            ["bug", ..] => Err(BrowserError::route(
                path,
                "expected /bug/<project>/<id>",
            )),
            _ => Err(BrowserError::route(path, "unknown route")),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("/"),
            Self::Bug { project, id } => write!(f, "/bug/{project}/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Back-navigable route history.
///
/// The current route is always the last entry; the history never empties.
#[derive(Debug, Clone)]
pub struct RouteHistory {
    entries: Vec<Route>,
    limit: usize,
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RouteHistory {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: vec![Route::List],
            limit: limit.max(2),
        }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        // entries is never empty
        &self.entries[self.entries.len() - 1]
    }

    /// Push a route unless it is already current.
    pub fn push(&mut self, route: Route) {
        if *self.current() == route {
            return;
        }
        self.entries.push(route);
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
    }

    /// Drop the current route and return the one before it.
    pub fn back(&mut self) -> Option<&Route> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
