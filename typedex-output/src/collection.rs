//! Collections and collection validators.
//!
//! A [`Collection`] is the success value of the pipeline: the validated
//! records, in the order they appeared in the response, together with the
//! top-level key they were decoded from. Collection validators run once over
//! the whole batch after every record has passed.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use typedex_schema::{FieldValue, Record};

/// Ordered, validated records of one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    key: String,
    schema: String,
    records: Vec<Record>,
}

impl Collection {
    pub(crate) fn new(key: impl Into<String>, schema: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            key: key.into(),
            schema: schema.into(),
            records,
        }
    }

    /// Top-level key the records were nested under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the records' schema.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Records in response order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Take the records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Encode as `{ key: [records...] }`, the shape it was decoded from.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        map.insert(
            self.key.clone(),
            JsonValue::Array(self.records.iter().map(Record::to_json).collect()),
        );
        JsonValue::Object(map)
    }

    /// Convert every record into an application type via serde.
    ///
    /// # Errors
    ///
    /// Returns the first record's error if `T` does not accept its shape.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.records.iter().map(Record::deserialize_into).collect()
    }
}

impl IntoIterator for Collection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A whole-batch check over all records.
pub trait CollectionValidator: Send + Sync {
    /// Short name used in debug output.
    fn name(&self) -> &str;

    /// Check the batch, returning the reason on failure.
    fn check(&self, records: &[Record]) -> Result<(), String>;
}

/// Shared collection validator for dynamic dispatch.
pub type BoxedCollectionValidator = Arc<dyn CollectionValidator>;

impl fmt::Debug for dyn CollectionValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionValidator({})", self.name())
    }
}

/// Closure-backed collection validator.
pub struct FnCollectionValidator<F> {
    name: String,
    func: F,
}

impl<F> FnCollectionValidator<F>
where
    F: Fn(&[Record]) -> Result<(), String> + Send + Sync,
{
    /// Create a new closure validator.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> CollectionValidator for FnCollectionValidator<F>
where
    F: Fn(&[Record]) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, records: &[Record]) -> Result<(), String> {
        (self.func)(records)
    }
}

impl<F> fmt::Debug for FnCollectionValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCollectionValidator")
            .field("name", &self.name)
            .finish()
    }
}

/// Helper function to create a collection validator from a closure.
pub fn collection_validator<F>(name: impl Into<String>, func: F) -> FnCollectionValidator<F>
where
    F: Fn(&[Record]) -> Result<(), String> + Send + Sync,
{
    FnCollectionValidator::new(name, func)
}

/// How key fields are compared when looking for duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    /// Compare strings case-insensitively.
    pub case_insensitive: bool,
    /// Trim and collapse runs of whitespace to one space.
    pub collapse_whitespace: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            collapse_whitespace: true,
        }
    }
}

impl Normalization {
    /// Compare values exactly.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            case_insensitive: false,
            collapse_whitespace: false,
        }
    }

    fn apply(&self, s: &str) -> String {
        let s = if self.collapse_whitespace {
            s.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            s.to_string()
        };
        if self.case_insensitive {
            s.to_lowercase()
        } else {
            s
        }
    }
}

/// Two records are duplicates when every key field is equal after
/// normalization. An absent key field only equals another absent one; it
/// never equals a present value, whatever its text.
#[derive(Debug, Clone)]
pub struct DuplicateCheck {
    fields: Vec<String>,
    normalization: Normalization,
}

impl DuplicateCheck {
    /// Detect duplicates on the given key fields.
    pub fn on<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            normalization: Normalization::default(),
        }
    }

    /// Set the normalization.
    #[must_use]
    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// The duplicate key of a record, one entry per key field.
    ///
    /// `None` stands for an absent value or a field the record's schema does
    /// not declare.
    #[must_use]
    pub fn key_of(&self, record: &Record) -> Vec<Option<String>> {
        self.fields
            .iter()
            .map(|field| record.get(field).and_then(|value| self.render(value)))
            .collect()
    }

    fn render(&self, value: &FieldValue) -> Option<String> {
        if value.is_absent() {
            return None;
        }
        Some(match value.as_str() {
            Some(s) => self.normalization.apply(s),
            None => value.to_json().to_string(),
        })
    }
}

impl CollectionValidator for DuplicateCheck {
    fn name(&self) -> &str {
        "duplicate_check"
    }

    fn check(&self, records: &[Record]) -> Result<(), String> {
        let mut seen: HashMap<Vec<Option<String>>, usize> = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if let Some(first) = seen.insert(self.key_of(record), index) {
                return Err(format!(
                    "records {first} and {index} are duplicates on ({})",
                    self.fields.join(", ")
                ));
            }
        }
        Ok(())
    }
}

/// The batch must contain at least one record.
///
/// Whether a response *should* have yielded records depends on the source
/// text, so this is only a best-effort signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmpty;

impl CollectionValidator for NonEmpty {
    fn name(&self) -> &str {
        "non_empty"
    }

    fn check(&self, records: &[Record]) -> Result<(), String> {
        if records.is_empty() {
            return Err("no records were extracted".to_string());
        }
        Ok(())
    }
}

/// The batch may contain at most `max` records.
#[derive(Debug, Clone, Copy)]
pub struct MaxRecords(pub usize);

impl CollectionValidator for MaxRecords {
    fn name(&self) -> &str {
        "max_records"
    }

    fn check(&self, records: &[Record]) -> Result<(), String> {
        if records.len() > self.0 {
            return Err(format!(
                "{} records extracted, at most {} allowed",
                records.len(),
                self.0
            ));
        }
        Ok(())
    }
}

/// Chain multiple collection validators; the first failure is returned.
#[derive(Clone, Default)]
pub struct CollectionValidatorChain {
    validators: Vec<BoxedCollectionValidator>,
}

impl CollectionValidatorChain {
    /// Create a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the chain.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add<V: CollectionValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Get the number of validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl CollectionValidator for CollectionValidatorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn check(&self, records: &[Record]) -> Result<(), String> {
        self.validators.iter().try_for_each(|v| v.check(records))
    }
}

impl fmt::Debug for CollectionValidatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionValidatorChain")
            .field("count", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;
    use typedex_schema::{bind, Schema};

    fn schema() -> Schema {
        Schema::builder("Address")
            .string("name", true)
            .string("street_name", true)
            .string("city", false)
            .build()
            .unwrap()
    }

    fn records(values: &[JsonValue]) -> Vec<Record> {
        let s = schema();
        values.iter().map(|v| bind(v, &s).unwrap()).collect()
    }

    #[test]
    fn test_duplicate_check_normalizes() {
        let batch = records(&[
            json!({"name": "Sarah Wilson", "street_name": "Laurier Avenue"}),
            json!({"name": "Tech Corp", "street_name": "Terry Fox Drive"}),
            json!({"name": "  sarah   WILSON ", "street_name": "laurier avenue"}),
        ]);
        let check = DuplicateCheck::on(["name", "street_name"]);
        let reason = check.check(&batch).unwrap_err();
        assert!(reason.contains("records 0 and 2"));
        assert!(reason.contains("name, street_name"));
    }

    #[test]
    fn test_duplicate_check_exact() {
        let batch = records(&[
            json!({"name": "Sarah Wilson", "street_name": "Laurier Avenue"}),
            json!({"name": "sarah wilson", "street_name": "Laurier Avenue"}),
        ]);
        let check = DuplicateCheck::on(["name", "street_name"]).normalization(Normalization::exact());
        assert!(check.check(&batch).is_ok());
    }

    #[test]
    fn test_duplicate_check_absent_fields_compare_equal() {
        let batch = records(&[
            json!({"name": "A", "street_name": "Main"}),
            json!({"name": "A", "street_name": "Main", "city": null}),
        ]);
        assert!(DuplicateCheck::on(["name", "city"]).check(&batch).is_err());
        assert_eq!(DuplicateCheck::on(["city"]).key_of(&batch[0]), vec![None]);
    }

    #[rstest]
    #[case::title_case("Null")]
    #[case::upper_case("NULL")]
    #[case::lower_case("null")]
    #[case::empty("")]
    fn test_absent_field_never_equals_present_text(#[case] city: &str) {
        let batch = records(&[
            json!({"name": "A", "street_name": "Main"}),
            json!({"name": "A", "street_name": "Main", "city": city}),
        ]);
        assert!(DuplicateCheck::on(["name", "city"]).check(&batch).is_ok());
    }

    #[test]
    fn test_undeclared_key_field_never_equals_empty_string() {
        let check = DuplicateCheck::on(["name", "country"]);
        let batch = records(&[json!({"name": "", "street_name": "Main"})]);
        assert_eq!(check.key_of(&batch[0]), vec![Some(String::new()), None]);
    }

    #[test]
    fn test_distinct_records_pass() {
        let batch = records(&[
            json!({"name": "A", "street_name": "Main"}),
            json!({"name": "A", "street_name": "Elm"}),
        ]);
        assert!(DuplicateCheck::on(["name", "street_name"]).check(&batch).is_ok());
    }

    #[test]
    fn test_non_empty_and_max() {
        assert!(NonEmpty.check(&[]).is_err());
        let batch = records(&[json!({"name": "A", "street_name": "Main"})]);
        assert!(NonEmpty.check(&batch).is_ok());
        assert!(MaxRecords(1).check(&batch).is_ok());
        assert!(MaxRecords(0).check(&batch).is_err());
    }

    #[test]
    fn test_chain() {
        let chain = CollectionValidatorChain::new()
            .add(NonEmpty)
            .add(collection_validator("never", |_: &[Record]| Err("nope".to_string())));
        assert_eq!(chain.check(&[]).unwrap_err(), "no records were extracted");
        let batch = records(&[json!({"name": "A", "street_name": "Main"})]);
        assert_eq!(chain.check(&batch).unwrap_err(), "nope");
    }

    #[test]
    fn test_collection_accessors_and_typed_view() {
        #[derive(Deserialize)]
        struct Address {
            name: String,
            city: Option<String>,
        }

        let batch = records(&[
            json!({"name": "A", "street_name": "Main", "city": "Ottawa"}),
            json!({"name": "B", "street_name": "Elm"}),
        ]);
        let collection = Collection::new("addresses", "Address", batch);
        assert_eq!(collection.key(), "addresses");
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(1).and_then(|r| r.get_str("name")), Some("B"));

        let json = collection.to_json();
        assert_eq!(json["addresses"][0]["city"], "Ottawa");

        let typed: Vec<Address> = collection.deserialize_into().unwrap();
        assert_eq!(typed[0].name, "A");
        assert!(typed[1].city.is_none());

        let names: Vec<_> = collection.iter().filter_map(|r| r.get_str("name")).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(collection.into_records().len(), 2);
    }
}
