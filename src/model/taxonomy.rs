//! Classification taxonomy: human-readable labels for classification keys.
//!
//! The document is three levels deep: category ("Repair Actions") → group
//! ("Assignment") → short key ("assignAdd") → label. Lookups are linear scans
//! in document order; the taxonomy is small and fixed.

use super::BugRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category holding repair action labels.
pub const REPAIR_ACTIONS: &str = "Repair Actions";
/// Category holding repair pattern labels.
pub const REPAIR_PATTERNS: &str = "Repair Patterns";
/// Pseudo-category for flags the taxonomy does not describe.
pub const UNCLASSIFIED: &str = "Other";
/// Category holding runtime information groups.
pub const RUNTIME_INFORMATION: &str = "Runtime Information";
/// Group of [`RUNTIME_INFORMATION`] listing automatic repair tools.
pub const AUTOMATIC_REPAIR: &str = "Automatic Repair";

/// Label descriptor for one classification key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    /// Short display name
    #[serde(default)]
    pub name: String,
    /// Long display name, preferred when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fullname: None,
        }
    }

    #[must_use]
    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    /// The best human label: `fullname` if non-empty, else `name`.
    #[must_use]
    pub fn display(&self) -> &str {
        match self.fullname.as_deref() {
            Some(full) if !full.is_empty() => full,
            _ => &self.name,
        }
    }
}

type Group = IndexMap<String, Label>;
type Category = IndexMap<String, Group>;

/// One key of the taxonomy with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyEntry<'a> {
    pub category: &'a str,
    pub group: &'a str,
    pub key: &'a str,
    pub label: &'a Label,
}

/// The flags of one record that fall into one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagGroup<'a> {
    pub category: &'a str,
    /// `(group, key, label)` in taxonomy order
    pub flags: Vec<(&'a str, &'a str, &'a str)>,
}

/// The nested label dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: IndexMap<String, Category>,
}

impl Taxonomy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, creating the category and group as needed.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        group: impl Into<String>,
        key: impl Into<String>,
        label: Label,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .entry(group.into())
            .or_default()
            .insert(key.into(), label);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of keys across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Category names in document order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Every key with its category and group, in document order.
    pub fn entries(&self) -> impl Iterator<Item = TaxonomyEntry<'_>> {
        self.categories.iter().flat_map(|(category, groups)| {
            groups.iter().flat_map(move |(group, labels)| {
                labels.iter().map(move |(key, label)| TaxonomyEntry {
                    category,
                    group,
                    key,
                    label,
                })
            })
        })
    }

    /// First label registered for `key` in any category.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Label> {
        self.categories
            .values()
            .flat_map(IndexMap::values)
            .find_map(|group| group.get(key))
    }

    /// Human label for `key`, or `key` itself when the taxonomy does not know it.
    #[must_use]
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.find(key).map_or(key, Label::display)
    }

    /// Label for `key` searched only within `category`.
    #[must_use]
    pub fn category_label(&self, category: &str, key: &str) -> Option<&str> {
        self.categories
            .get(category)?
            .values()
            .find_map(|group| group.get(key))
            .map(Label::display)
    }

    /// Label of an automatic repair tool.
    #[must_use]
    pub fn repair_label(&self, key: &str) -> Option<&str> {
        self.categories
            .get(RUNTIME_INFORMATION)?
            .get(AUTOMATIC_REPAIR)?
            .get(key)
            .map(Label::display)
    }

    /// Group the `true` flags of `bug` by category.
    ///
    /// Categories and keys follow taxonomy order; flags the taxonomy does not
    /// know are collected last under [`UNCLASSIFIED`], labelled by their key.
    #[must_use]
    pub fn classify<'a>(&'a self, bug: &'a BugRecord) -> Vec<FlagGroup<'a>> {
        let mut groups: Vec<FlagGroup<'a>> = Vec::new();
        for entry in self.entries().filter(|e| bug.flag(e.key)) {
            match groups.last_mut() {
                Some(group) if group.category == entry.category => {
                    group.flags.push((entry.group, entry.key, entry.label.display()));
                }
                _ => groups.push(FlagGroup {
                    category: entry.category,
                    flags: vec![(entry.group, entry.key, entry.label.display())],
                }),
            }
        }

        let unknown: Vec<_> = bug
            .active_flags()
            .filter(|key| self.find(key).is_none())
            .map(|key| ("", key, key))
            .collect();
        if !unknown.is_empty() {
            groups.push(FlagGroup {
                category: UNCLASSIFIED,
                flags: unknown,
            });
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Taxonomy {
        serde_json::from_value(json!({
            "Repair Actions": {
                "Assignment": {
                    "assignAdd": {"name": "Addition"},
                    "assignRem": {"name": "Removal", "fullname": "Assignment removal"}
                }
            },
            "Repair Patterns": {
                "Wraps-with": {
                    "wrapsIf": {"name": "Wraps-with if", "fullname": ""}
                }
            },
            "Runtime Information": {
                "Automatic Repair": {
                    "Nopol": {"name": "Nopol", "fullname": "Nopol (2017)"}
                }
            }
        }))
        .expect("valid taxonomy")
    }

    #[test]
    fn test_label_prefers_fullname() {
        let tax = sample();
        assert_eq!(tax.label("assignRem"), "Assignment removal");
        assert_eq!(tax.label("assignAdd"), "Addition");
    }

    #[test]
    fn test_empty_fullname_falls_back_to_name() {
        assert_eq!(sample().label("wrapsIf"), "Wraps-with if");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let tax = sample();
        assert_eq!(tax.label("noSuchKey"), "noSuchKey");
        assert_eq!(Taxonomy::new().label("assignAdd"), "assignAdd");
    }

    #[test]
    fn test_category_scoped_lookups() {
        let tax = sample();
        assert_eq!(tax.category_label(REPAIR_ACTIONS, "assignAdd"), Some("Addition"));
        assert_eq!(tax.category_label(REPAIR_PATTERNS, "assignAdd"), None);
        assert_eq!(tax.repair_label("Nopol"), Some("Nopol (2017)"));
        assert_eq!(tax.repair_label("assignAdd"), None);
    }

    #[test]
    fn test_entries_in_document_order() {
        let tax = sample();
        let keys: Vec<&str> = tax.entries().map(|e| e.key).collect();
        assert_eq!(keys, ["assignAdd", "assignRem", "wrapsIf", "Nopol"]);
        assert_eq!(tax.len(), 4);
        assert_eq!(
            tax.categories().collect::<Vec<_>>(),
            [REPAIR_ACTIONS, REPAIR_PATTERNS, RUNTIME_INFORMATION]
        );
    }

    #[test]
    fn test_classify_groups_flags_by_category() {
        let tax = sample();
        let bug = BugRecord::new("Chart", "1")
            .with_field("wrapsIf", true)
            .with_field("assignAdd", true)
            .with_field("assignRem", false)
            .with_field("customFlag", true);

        let groups = tax.classify(&bug);
        let categories: Vec<&str> = groups.iter().map(|g| g.category).collect();
        assert_eq!(categories, [REPAIR_ACTIONS, REPAIR_PATTERNS, UNCLASSIFIED]);
        assert_eq!(groups[0].flags, [("Assignment", "assignAdd", "Addition")]);
        assert_eq!(groups[2].flags, [("", "customFlag", "customFlag")]);
    }

    #[test]
    fn test_insert_builds_nesting() {
        let mut tax = Taxonomy::new();
        tax.insert("C", "G", "k", Label::new("K").with_fullname("Key"));
        assert_eq!(tax.label("k"), "Key");
        assert!(!tax.is_empty());
    }
}
