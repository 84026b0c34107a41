//! Validated records.
//!
//! A [`Record`] is only ever produced by the binder after every field has been
//! type-checked and validated, so holding one is proof that it satisfies its
//! schema. Records are immutable.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// A bound field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// An optional field that was missing or null in the response.
    Absent,
    /// String value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Enum variant name.
    Enum(String),
    /// Nested record.
    Record(Record),
    /// List of values.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Whether this is the absent marker.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// String content of a string or enum value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content of an integer or number value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean content.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Nested record.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// List items.
    #[must_use]
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Encode back into a JSON tree. `Absent` becomes `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Absent => JsonValue::Null,
            Self::String(s) | Self::Enum(s) => JsonValue::String(s.clone()),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Record(r) => r.to_json(),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// A fully validated instance of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<str>,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(schema: Arc<str>, fields: IndexMap<String, FieldValue>) -> Self {
        Self { schema, fields }
    }

    /// Name of the schema this record was bound against.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Value of a field. `None` if the schema has no such field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// String content of a string or enum field.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Integer content of a field.
    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_i64)
    }

    /// Nested record in a field.
    #[must_use]
    pub fn get_record(&self, field: &str) -> Option<&Record> {
        self.get(field).and_then(FieldValue::as_record)
    }

    /// Whether a field holds the absent marker.
    #[must_use]
    pub fn is_absent(&self, field: &str) -> bool {
        self.get(field).is_some_and(FieldValue::is_absent)
    }

    /// Fields in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        JsonValue::Object(map)
    }

    /// Convert into an application type via serde.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` does not accept the record's shape.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> Record {
        let mut unit = IndexMap::new();
        unit.insert("unit_number".to_string(), FieldValue::String("4B".into()));
        unit.insert("floor".to_string(), FieldValue::Absent);

        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), FieldValue::String("John Smith".into()));
        fields.insert("count".to_string(), FieldValue::Integer(3));
        fields.insert("kind".to_string(), FieldValue::Enum("residential".into()));
        fields.insert(
            "unit".to_string(),
            FieldValue::Record(Record::new(Arc::from("Unit"), unit)),
        );
        fields.insert("note".to_string(), FieldValue::Absent);
        Record::new(Arc::from("Sample"), fields)
    }

    #[test]
    fn test_accessors() {
        let record = sample();
        assert_eq!(record.schema_name(), "Sample");
        assert_eq!(record.get_str("name"), Some("John Smith"));
        assert_eq!(record.get_str("kind"), Some("residential"));
        assert_eq!(record.get_i64("count"), Some(3));
        assert!(record.is_absent("note"));
        assert!(!record.is_absent("missing"));
        assert_eq!(
            record.get_record("unit").and_then(|u| u.get_str("unit_number")),
            Some("4B")
        );
    }

    #[test]
    fn test_to_json_preserves_order_and_absent() {
        let json = sample().to_json();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "count", "kind", "unit", "note"]);
        assert!(json["note"].is_null());
        assert!(json["unit"]["floor"].is_null());
    }

    #[test]
    fn test_deserialize_into() {
        #[derive(Deserialize)]
        struct Unit {
            unit_number: String,
            floor: Option<String>,
        }

        #[derive(Deserialize)]
        struct Sample {
            name: String,
            count: u32,
            unit: Unit,
            note: Option<String>,
        }

        let typed: Sample = sample().deserialize_into().unwrap();
        assert_eq!(typed.name, "John Smith");
        assert_eq!(typed.count, 3);
        assert_eq!(typed.unit.unit_number, "4B");
        assert!(typed.unit.floor.is_none());
        assert!(typed.note.is_none());
    }
}
