//! Sort comparator and column-click handling.

use crate::model::BugRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field used as primary key by the default sort and the project column.
pub const PROJECT_FIELD: &str = "project";

/// Ordered sort fields plus a direction flag.
///
/// Only the first field takes part in comparisons; the rest of the list is
/// carried along (it identifies the clicked column) but never breaks ties.
/// Ties keep load order because sorting is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub fields: Vec<String>,
    pub reverse: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(["project", "commit"])
    }
}

impl SortSpec {
    /// Ascending spec over `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            reverse: false,
        }
    }

    #[must_use]
    pub const fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// The field actually compared.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Compare two records by the primary field.
    #[must_use]
    pub fn compare(&self, a: &BugRecord, b: &BugRecord) -> Ordering {
        let Some(field) = self.primary() else {
            return Ordering::Equal;
        };
        let ordering = a.field(field).compare(&b.field(field));
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable sort of `items` by this spec.
    pub fn sort<T, F>(&self, items: &mut [T], record: F)
    where
        F: Fn(&T) -> &BugRecord,
    {
        items.sort_by(|a, b| self.compare(record(a), record(b)));
    }

    /// Apply a column click.
    ///
    /// Clicking the current column flips the direction; clicking another one
    /// replaces the fields and resets to ascending. Two selections keyed on
    /// `project` count as the same column whatever follows the primary key.
    pub fn click<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let same_column = fields == self.fields
            || (fields.first().map(String::as_str) == Some(PROJECT_FIELD)
                && self.primary() == Some(PROJECT_FIELD));

        if same_column {
            self.reverse = !self.reverse;
        } else {
            self.fields = fields;
            self.reverse = false;
        }
    }

    /// Short label such as `project ↑`.
    #[must_use]
    pub fn describe(&self) -> String {
        let arrow = if self.reverse { "↓" } else { "↑" };
        format!("{} {arrow}", self.primary().unwrap_or("-"))
    }
}
