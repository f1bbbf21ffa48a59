//! Item metadata record model.
//!
//! The archive's metadata endpoint returns loosely typed JSON: any field may be
//! missing, empty, a scalar string or number, or a list of them. This module
//! converts that response into a [`MetadataRecord`] where every property is an
//! explicit `Option`, so callers handle absence instead of relying on silent
//! fallbacks.

use serde_json::{Map, Value};

/// A metadata property value: a single text value or an ordered list.
///
/// Numbers are carried as their decimal text. Empty strings and empty lists
/// never appear here; they are treated as absent when the record is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single scalar value.
    Text(String),
    /// Ordered list of values (never empty).
    List(Vec<String>),
}

impl FieldValue {
    /// Builds a value from raw JSON, returning `None` for absent or empty values.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let items: Vec<String> = items.iter().filter_map(scalar_text).collect();
                (!items.is_empty()).then_some(Self::List(items))
            }
            other => scalar_text(other)
                .filter(|text| !text.is_empty())
                .map(Self::Text),
        }
    }

    /// First element of a list, or the scalar itself.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(items) => items.first().map(String::as_str),
        }
    }

    /// Last element of a list, or the scalar itself.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(items) => items.last().map(String::as_str),
        }
    }

    /// All values in order; a scalar yields one item.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Text form stored in the catalog; list elements are joined with `"; "`.
    #[must_use]
    pub fn display(&self) -> String {
        self.values().join("; ")
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// One entry of an item's file list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileEntry {
    /// File name as stored in the archive, when present and textual.
    pub name: Option<String>,
}

impl FileEntry {
    /// Creates an entry with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    fn from_json(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        Self { name }
    }
}

/// Structured metadata for one archived item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataRecord {
    pub title: Option<FieldValue>,
    pub creator: Option<FieldValue>,
    pub year: Option<FieldValue>,
    pub uploader: Option<FieldValue>,
    pub language: Option<FieldValue>,
    /// Files in the order the archive lists them.
    pub files: Vec<FileEntry>,
    /// Server-side storage directory of the item (`dir` in the response).
    pub storage_dir: Option<String>,
}

impl MetadataRecord {
    /// Builds a record from a metadata response body.
    ///
    /// Returns `None` when the response has no `metadata` object, which is how
    /// the archive reports an item without usable metadata.
    #[must_use]
    pub fn from_response(body: &Value) -> Option<Self> {
        let metadata = body.get("metadata").and_then(Value::as_object)?;

        let files = body
            .get("files")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(FileEntry::from_json).collect())
            .unwrap_or_default();

        let storage_dir = body
            .get("dir")
            .and_then(Value::as_str)
            .filter(|dir| !dir.is_empty())
            .map(ToString::to_string);

        Some(Self {
            title: property(metadata, "title"),
            creator: property(metadata, "creator"),
            year: property(metadata, "year"),
            uploader: property(metadata, "uploader"),
            language: property(metadata, "language"),
            files,
            storage_dir,
        })
    }
}

fn property(metadata: &Map<String, Value>, key: &str) -> Option<FieldValue> {
    metadata.get(key).and_then(FieldValue::from_json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_response_without_metadata_is_absent() {
        assert!(MetadataRecord::from_response(&json!({})).is_none());
        assert!(MetadataRecord::from_response(&json!({"files": []})).is_none());
        assert!(MetadataRecord::from_response(&json!({"metadata": "oops"})).is_none());
    }

    #[test]
    fn test_from_response_reads_all_fields() {
        let body = json!({
            "dir": "/1/items/id1",
            "metadata": {
                "title": "My Book",
                "creator": ["Smith, J.", "Doe, A."],
                "year": 1920,
                "uploader": "Jane <jane@example.org>",
                "language": "English"
            },
            "files": [{"name": "id1_text.pdf", "size": "10"}, {"format": "Metadata"}]
        });
        let record = MetadataRecord::from_response(&body).unwrap();

        assert_eq!(record.title, Some(FieldValue::Text("My Book".to_string())));
        assert_eq!(
            record.creator,
            Some(FieldValue::List(vec![
                "Smith, J.".to_string(),
                "Doe, A.".to_string()
            ]))
        );
        assert_eq!(record.year, Some(FieldValue::Text("1920".to_string())));
        assert_eq!(record.storage_dir.as_deref(), Some("/1/items/id1"));
        assert_eq!(record.files.len(), 2);
        assert_eq!(record.files[0].name.as_deref(), Some("id1_text.pdf"));
        assert_eq!(record.files[1].name, None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let body = json!({
            "metadata": {"title": "", "creator": [], "year": null, "language": [null]}
        });
        let record = MetadataRecord::from_response(&body).unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.creator, None);
        assert_eq!(record.year, None);
        assert_eq!(record.language, None);
        assert!(record.files.is_empty());
        assert_eq!(record.storage_dir, None);
    }

    #[test]
    fn test_field_value_accessors() {
        let list = FieldValue::List(vec!["1919".to_string(), "1920".to_string()]);
        assert_eq!(list.first(), Some("1919"));
        assert_eq!(list.last(), Some("1920"));
        assert_eq!(list.display(), "1919; 1920");

        let text = FieldValue::Text("1920".to_string());
        assert_eq!(text.first(), Some("1920"));
        assert_eq!(text.last(), Some("1920"));
        assert_eq!(text.display(), "1920");
    }
}
