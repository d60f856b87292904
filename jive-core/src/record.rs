use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw server response fragment: an ordered, string-keyed mapping of
/// loosely-typed values (scalars, nested mappings, arrays of mappings).
/// Immutable once received.
///
/// Menu records coming from the server are deeply nested and dynamically
/// typed, so all lookups go through the typed accessors below.  Code outside
/// the decoder never touches the raw values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// View a JSON value as a record, if it is a mapping.
    pub fn from_value(value: &Value) -> Option<Record> {
        value.as_object().cloned().map(Record)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.0.iter()
    }

    /// String value under `key`.  Servers are sloppy about numeric fields, so
    /// numbers read as their decimal representation.
    pub fn string_value(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn string_or_empty(&self, key: &str) -> String {
        self.string_value(key).unwrap_or_default()
    }

    /// Integer value under `key`, accepting both numbers and numeric strings.
    pub fn int_value(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Nested record under `key`, if the value is a mapping.
    pub fn record(&self, key: &str) -> Option<Record> {
        Record::from_value(self.0.get(key)?)
    }

    /// Nested array of records under `key`.  The distinction between a
    /// missing key and a present-but-empty array is preserved.
    pub fn record_list(&self, key: &str) -> Option<Vec<Record>> {
        let entries = self.0.get(key)?.as_array()?;
        Some(entries.iter().filter_map(Record::from_value).collect())
    }

    /// String list under `key`.  A single scalar reads as a one-element list,
    /// a missing key as an empty one.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(entries)) => entries.iter().filter_map(scalar_string).collect(),
            Some(value) => scalar_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Key-by-key merge of two optional records, `item` values taking
    /// precedence over `base` values when both are present.
    pub fn merged(base: Option<&Record>, item: Option<&Record>) -> Record {
        let mut fields = Map::new();
        if let Some(base) = base {
            fields.extend(base.0.clone());
        }
        if let Some(item) = item {
            fields.extend(item.0.clone());
        }
        Record(fields)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Record {
        Record(fields)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(&value).unwrap()
    }

    #[test]
    fn string_values_accept_numbers() {
        let rec = record(json!({ "id": 42, "name": "Songs" }));
        assert_eq!(rec.string_value("id").as_deref(), Some("42"));
        assert_eq!(rec.string_value("name").as_deref(), Some("Songs"));
        assert_eq!(rec.string_value("missing"), None);
    }

    #[test]
    fn int_values_accept_numeric_strings() {
        let rec = record(json!({ "weight": "50", "count": 3 }));
        assert_eq!(rec.int_value("weight"), Some(50));
        assert_eq!(rec.int_value("count"), Some(3));
        assert_eq!(rec.int_value("missing"), None);
    }

    #[test]
    fn record_list_preserves_empty_vs_missing() {
        let rec = record(json!({ "item_loop": [] }));
        assert_eq!(rec.record_list("item_loop"), Some(Vec::new()));
        assert_eq!(rec.record_list("other_loop"), None);
    }

    #[test]
    fn string_list_accepts_single_scalar() {
        let rec = record(json!({ "cmd": "status", "tags": ["a", "b"] }));
        assert_eq!(rec.string_list("cmd"), vec!["status"]);
        assert_eq!(rec.string_list("tags"), vec!["a", "b"]);
        assert!(rec.string_list("missing").is_empty());
    }

    #[test]
    fn merge_prefers_item_values() {
        let base = record(json!({ "text": "Base", "icon": "base.png" }));
        let item = record(json!({ "text": "Item" }));
        let merged = Record::merged(Some(&base), Some(&item));
        assert_eq!(merged.string_value("text").as_deref(), Some("Item"));
        assert_eq!(merged.string_value("icon").as_deref(), Some("base.png"));
    }
}
