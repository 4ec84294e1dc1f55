//! Bug filter predicate.
//!
//! A filter set maps classification keys to an "active" flag. Inactive
//! entries stay in the set (the sidebar remembers them) but do not take part
//! in matching.

use crate::model::BugRecord;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the active filter keys combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every active key must be `true` on the record
    #[default]
    All,
    /// At least one active key must be `true` on the record
    Any,
}

impl MatchMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::All => Self::Any,
            Self::Any => Self::All,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => Err(format!("unknown match mode '{other}' (expected all or any)")),
        }
    }
}

/// Classification keys selected by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    keys: IndexMap<String, bool>,
}

impl FilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set with every given key active.
    pub fn with_active<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(|k| (k.into(), true)).collect(),
        }
    }

    /// Set the state of one key.
    pub fn set(&mut self, key: impl Into<String>, active: bool) {
        self.keys.insert(key.into(), active);
    }

    /// Flip one key, returning its new state.
    pub fn toggle(&mut self, key: &str) -> bool {
        let entry = self.keys.entry(key.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Deactivate every key.
    pub fn clear(&mut self) {
        for active in self.keys.values_mut() {
            *active = false;
        }
    }

    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Active keys in insertion order.
    pub fn active_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|(_, active)| **active)
            .map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_keys().count()
    }

    /// True when no key is active (empty set or all false).
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.active_keys().next().is_none()
    }

    /// Decide whether `bug` passes this filter under `mode`.
    ///
    /// With no active key every record passes, whatever the mode.
    #[must_use]
    pub fn accepts(&self, bug: &BugRecord, mode: MatchMode) -> bool {
        if self.is_pass_through() {
            return true;
        }

        for key in self.active_keys() {
            if bug.flag(key) {
                if mode == MatchMode::Any {
                    return true;
                }
            } else if mode == MatchMode::All {
                return false;
            }
        }

        match mode {
            MatchMode::Any => false,
            MatchMode::All => true,
        }
    }
}
