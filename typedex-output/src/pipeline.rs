//! The extraction pipeline.
//!
//! Raw response text goes through four stages, each of which can stop the run
//! with one classified [`ValidationError`]:
//!
//! 1. decode the text as one JSON document
//! 2. bind every item of the collection to the schema (field validators run here)
//! 3. run the record validator on each bound record
//! 4. run the collection validator on the whole batch
//!
//! Every function here is pure: no state is kept between calls and nothing is
//! retried.

use serde_json::Value as JsonValue;
use tracing::debug;
use typedex_core::{decode_with, kind_name, DecodeOptions, FieldPath, Outcome, ValidationError};
use typedex_schema::{bind_record, FieldValidatorSet, Record, Schema};

use crate::collection::{Collection, CollectionValidator};
use crate::record::RecordValidator;
use crate::spec::ExtractionSpec;

/// Extract a collection of records from a raw response.
///
/// The response must be a JSON object whose `key` member is an array of
/// objects matching `schema`.
pub fn extract(
    raw: &str,
    schema: &Schema,
    key: &str,
    field_validators: &FieldValidatorSet,
    record_validator: Option<&dyn RecordValidator>,
    collection_validator: Option<&dyn CollectionValidator>,
) -> Outcome<Collection> {
    extract_with(
        raw,
        schema,
        key,
        field_validators,
        record_validator,
        collection_validator,
        &DecodeOptions::default(),
    )
}

/// [`extract`] with explicit decoder options.
pub fn extract_with(
    raw: &str,
    schema: &Schema,
    key: &str,
    field_validators: &FieldValidatorSet,
    record_validator: Option<&dyn RecordValidator>,
    collection_validator: Option<&dyn CollectionValidator>,
    options: &DecodeOptions,
) -> Outcome<Collection> {
    let result = run_collection(
        raw,
        schema,
        key,
        field_validators,
        record_validator,
        collection_validator,
        options,
    );
    log_outcome(schema.name(), &result.as_ref().map(Collection::len));
    result
}

/// Extract a single record from a response whose root object is the record.
pub fn extract_one(
    raw: &str,
    schema: &Schema,
    field_validators: &FieldValidatorSet,
    record_validator: Option<&dyn RecordValidator>,
) -> Outcome<Record> {
    extract_one_with(
        raw,
        schema,
        field_validators,
        record_validator,
        &DecodeOptions::default(),
    )
}

/// [`extract_one`] with explicit decoder options.
pub fn extract_one_with(
    raw: &str,
    schema: &Schema,
    field_validators: &FieldValidatorSet,
    record_validator: Option<&dyn RecordValidator>,
    options: &DecodeOptions,
) -> Outcome<Record> {
    let result = decode_with(raw, options)
        .map_err(ValidationError::from)
        .and_then(|tree| {
            let path = FieldPath::root();
            let record = bind_record(&tree, schema, field_validators, &path)?;
            check_record(&record, record_validator, &path)?;
            Ok(record)
        });
    log_outcome(schema.name(), &result.as_ref().map(|_| 1));
    result
}

fn run_collection(
    raw: &str,
    schema: &Schema,
    key: &str,
    field_validators: &FieldValidatorSet,
    record_validator: Option<&dyn RecordValidator>,
    collection_validator: Option<&dyn CollectionValidator>,
    options: &DecodeOptions,
) -> Outcome<Collection> {
    let tree = decode_with(raw, options)?;
    debug!(schema = schema.name(), key, "Decoded response");

    let items = collection_items(&tree, schema, key)?;
    let base = FieldPath::field(key);

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = base.index(index);
        let record = bind_record(item, schema, field_validators, &path)?;
        check_record(&record, record_validator, &path)?;
        records.push(record);
    }
    debug!(schema = schema.name(), count = records.len(), "Bound records");

    if let Some(validator) = collection_validator {
        validator
            .check(&records)
            .map_err(|reason| ValidationError::collection_inconsistency(key, reason))?;
    }

    Ok(Collection::new(key, schema.name(), records))
}

fn collection_items<'a>(
    tree: &'a JsonValue,
    schema: &Schema,
    key: &str,
) -> Outcome<&'a [JsonValue]> {
    let root = tree.as_object().ok_or_else(|| {
        ValidationError::type_mismatch(
            FieldPath::root(),
            format!("object with '{key}'"),
            kind_name(tree),
        )
    })?;
    let path = FieldPath::field(key);
    match root.get(key) {
        None => Err(ValidationError::missing_field(path)),
        Some(JsonValue::Null) => Err(ValidationError::null_required(path)),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(ValidationError::type_mismatch(
            path,
            format!("array of object ({})", schema.name()),
            kind_name(other),
        )),
    }
}

fn check_record(
    record: &Record,
    validator: Option<&dyn RecordValidator>,
    path: &FieldPath,
) -> Outcome<()> {
    let Some(validator) = validator else {
        return Ok(());
    };
    validator
        .check(record)
        .map_err(|reason| ValidationError::record_inconsistency(path.clone(), reason))
}

fn log_outcome(schema: &str, result: &Result<usize, &ValidationError>) {
    match result {
        Ok(count) => debug!(schema, count, "Extraction succeeded"),
        Err(err) => debug!(
            schema,
            kind = %err.kind(),
            path = %err.path().map_or_else(String::new, ToString::to_string),
            error = %err,
            "Extraction failed"
        ),
    }
}

/// A reusable extractor bound to one [`ExtractionSpec`].
///
/// Extractors are immutable and `Send + Sync`; share one behind an `Arc` to
/// extract from many responses concurrently.
#[derive(Debug, Clone)]
pub struct Extractor {
    spec: ExtractionSpec,
}

impl Extractor {
    /// Create an extractor for a spec.
    #[must_use]
    pub fn new(spec: ExtractionSpec) -> Self {
        Self { spec }
    }

    /// The extraction spec this extractor runs.
    #[must_use]
    pub fn spec(&self) -> &ExtractionSpec {
        &self.spec
    }

    /// Extract the configured collection from a raw response.
    pub fn extract(&self, raw: &str) -> Outcome<Collection> {
        extract_with(
            raw,
            self.spec.schema(),
            self.spec.key(),
            self.spec.field_validators(),
            self.spec.record_validator(),
            self.spec.collection_validator(),
            self.spec.decode_options(),
        )
    }

    /// Extract one record of the configured schema from a raw response whose root
    /// is the record. The collection key and validator are not used.
    pub fn extract_one(&self, raw: &str) -> Outcome<Record> {
        extract_one_with(
            raw,
            self.spec.schema(),
            self.spec.field_validators(),
            self.spec.record_validator(),
            self.spec.decode_options(),
        )
    }
}

impl From<ExtractionSpec> for Extractor {
    fn from(spec: ExtractionSpec) -> Self {
        Self::new(spec)
    }
}
