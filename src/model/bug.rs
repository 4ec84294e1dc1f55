//! Bug records from the benchmark dataset.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use indexmap::IndexMap;

/// One entry of the bug dataset.
///
/// A record is identified by the `(project, commit)` pair. Every other field
/// of the source document is kept verbatim in `fields`, in document order;
/// boolean fields are the classification flags the filters operate on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    /// Project the bug belongs to (e.g. "Chart", "Closure")
    pub project: String,
    /// Bug identifier within the project
    #[serde(deserialize_with = "string_or_number")]
    pub commit: String,
    /// Raw unified diff of the fix
    #[serde(default, deserialize_with = "null_as_empty")]
    pub patch: String,
    /// Remaining fields: classification flags, metrics, free-form metadata
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl BugRecord {
    /// Create a record with no extra fields.
    pub fn new(project: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            commit: commit.into(),
            patch: String::new(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style helper to set a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder-style helper to set the patch text.
    #[must_use]
    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = patch.into();
        self
    }

    /// Whether this record is the one addressed by `(project, id)`.
    #[must_use]
    pub fn is(&self, project: &str, id: &str) -> bool {
        self.project == project && self.commit == id
    }

    /// Whether the classification flag `key` is exactly `true`.
    ///
    /// Missing keys and non-boolean values are not `true`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(Value::Bool(true)))
    }

    /// Keys of every flag set to `true`, in document order.
    pub fn active_flags(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, v)| matches!(v, Value::Bool(true)))
            .map(|(k, _)| k.as_str())
    }

    /// Resolve a sortable field by name.
    ///
    /// `project`, `commit` and `patch` map to the typed fields; anything else
    /// is looked up in `fields`, descending into nested objects on `.`.
    #[must_use]
    pub fn field(&self, path: &str) -> FieldValue<'_> {
        match path {
            "project" => return FieldValue::Str(&self.project),
            "commit" => return FieldValue::Str(&self.commit),
            "patch" => return FieldValue::Str(&self.patch),
            _ => {}
        }

        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return FieldValue::Missing;
        };
        let mut current = match self.fields.get(first) {
            Some(value) => value,
            None => return FieldValue::Missing,
        };
        for segment in segments {
            current = match current.get(segment) {
                Some(value) => value,
                None => return FieldValue::Missing,
            };
        }
        FieldValue::from_json(current)
    }

    /// Number of lines added and removed by the patch.
    #[must_use]
    pub fn patch_stats(&self) -> (usize, usize) {
        self.patch
            .lines()
            .filter(|l| !l.starts_with("+++") && !l.starts_with("---"))
            .fold((0, 0), |(added, removed), line| {
                if line.starts_with('+') {
                    (added + 1, removed)
                } else if line.starts_with('-') {
                    (added, removed + 1)
                } else {
                    (added, removed)
                }
            })
    }
}

/// A field value projected for comparison.
///
/// Values compare within their kind (`false < true`, numeric, lexicographic);
/// across kinds the order is bool < number < string, and a missing value
/// sorts after any present one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Bool(bool),
    Number(f64),
    Str(&'a str),
    /// Absent, null, or a composite value (array/object)
    Missing,
}

impl<'a> FieldValue<'a> {
    fn from_json(value: &'a Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Missing, Self::Number),
            Value::String(s) => Self::Str(s),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Missing,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Str(_) => 2,
            Self::Missing => 3,
        }
    }

    /// Total order over field values.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Display form used in tables.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Bool(true) => "yes".to_string(),
            Self::Bool(false) => "no".to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => format!("{n:.2}"),
            Self::Str(s) => (*s).to_string(),
            Self::Missing => "-".to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_extra_fields_in_order() {
        let bug: BugRecord = serde_json::from_value(json!({
            "project": "Chart",
            "commit": 1,
            "patch": null,
            "assignAdd": true,
            "condBlockRem": false,
            "metrics": {"chunks": 2}
        }))
        .expect("valid record");

        assert_eq!(bug.commit, "1");
        assert!(bug.patch.is_empty());
        let keys: Vec<&str> = bug.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["assignAdd", "condBlockRem", "metrics"]);
    }

    #[test]
    fn test_flag_requires_literal_true() {
        let bug = BugRecord::new("A", "1")
            .with_field("x", true)
            .with_field("y", false)
            .with_field("z", "true");
        assert!(bug.flag("x"));
        assert!(!bug.flag("y"));
        assert!(!bug.flag("z"));
        assert!(!bug.flag("missing"));
        assert_eq!(bug.active_flags().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn test_field_paths() {
        let bug = BugRecord::new("Lang", "7").with_field("metrics", json!({"chunks": 3}));
        assert_eq!(bug.field("project"), FieldValue::Str("Lang"));
        assert_eq!(bug.field("metrics.chunks"), FieldValue::Number(3.0));
        assert_eq!(bug.field("metrics.files"), FieldValue::Missing);
        assert_eq!(bug.field("metrics"), FieldValue::Missing);
    }

    #[test]
    fn test_field_value_order() {
        use FieldValue::*;
        assert_eq!(Bool(false).compare(&Bool(true)), Ordering::Less);
        assert_eq!(Number(10.0).compare(&Number(9.0)), Ordering::Greater);
        assert_eq!(Str("a").compare(&Str("b")), Ordering::Less);
        assert_eq!(Bool(true).compare(&Number(0.0)), Ordering::Less);
        assert_eq!(Str("z").compare(&Missing), Ordering::Less);
        assert_eq!(Missing.compare(&Missing), Ordering::Equal);
    }

    #[test]
    fn test_patch_stats_ignores_file_headers() {
        let bug = BugRecord::new("A", "1").with_patch(
            "--- a/Foo.java\n+++ b/Foo.java\n@@ -1,2 +1,2 @@\n-old\n+new\n+extra\n context\n",
        );
        assert_eq!(bug.patch_stats(), (2, 1));
    }
}
