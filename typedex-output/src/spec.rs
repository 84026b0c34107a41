//! Extraction specifications.
//!
//! An [`ExtractionSpec`] bundles everything the pipeline needs for one kind
//! of extraction: the record schema, the top-level collection key, and the
//! validators to run at each layer.

use std::fmt;
use std::sync::Arc;
use typedex_core::DecodeOptions;
use typedex_schema::{FieldValidatorSet, Schema};

use crate::collection::{BoxedCollectionValidator, CollectionValidator};
use crate::record::{BoxedRecordValidator, RecordValidator};

/// What to extract and how to check it.
#[derive(Clone)]
pub struct ExtractionSpec {
    schema: Arc<Schema>,
    key: String,
    field_validators: FieldValidatorSet,
    record_validator: Option<BoxedRecordValidator>,
    collection_validator: Option<BoxedCollectionValidator>,
    decode_options: DecodeOptions,
}

impl ExtractionSpec {
    /// Extract a list of `schema` records nested under `key`.
    pub fn new(schema: impl Into<Arc<Schema>>, key: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            key: key.into(),
            field_validators: FieldValidatorSet::new(),
            record_validator: None,
            collection_validator: None,
            decode_options: DecodeOptions::default(),
        }
    }

    /// Set the additional field validators.
    #[must_use]
    pub fn with_field_validators(mut self, validators: FieldValidatorSet) -> Self {
        self.field_validators = validators;
        self
    }

    /// Set the record validator.
    #[must_use]
    pub fn with_record_validator<V: RecordValidator + 'static>(mut self, validator: V) -> Self {
        self.record_validator = Some(Arc::new(validator));
        self
    }

    /// Set the collection validator.
    #[must_use]
    pub fn with_collection_validator<V: CollectionValidator + 'static>(
        mut self,
        validator: V,
    ) -> Self {
        self.collection_validator = Some(Arc::new(validator));
        self
    }

    /// Set the decoder options.
    #[must_use]
    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    /// Record schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Top-level collection key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Additional field validators.
    #[must_use]
    pub fn field_validators(&self) -> &FieldValidatorSet {
        &self.field_validators
    }

    /// Record validator, if any.
    #[must_use]
    pub fn record_validator(&self) -> Option<&dyn RecordValidator> {
        self.record_validator.as_deref()
    }

    /// Collection validator, if any.
    #[must_use]
    pub fn collection_validator(&self) -> Option<&dyn CollectionValidator> {
        self.collection_validator.as_deref()
    }

    /// Decoder options.
    #[must_use]
    pub fn decode_options(&self) -> &DecodeOptions {
        &self.decode_options
    }
}

impl fmt::Debug for ExtractionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionSpec")
            .field("schema", &self.schema.name())
            .field("key", &self.key)
            .field("field_validators", &self.field_validators)
            .field(
                "record_validator",
                &self.record_validator.as_ref().map(|v| v.name()),
            )
            .field(
                "collection_validator",
                &self.collection_validator.as_ref().map(|v| v.name()),
            )
            .field("decode_options", &self.decode_options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::NonEmpty;
    use crate::record::PresentOnlyWhen;

    #[test]
    fn test_spec_builder() {
        let schema = Schema::builder("Item").string("name", true).build().unwrap();
        let spec = ExtractionSpec::new(schema, "groceries")
            .with_record_validator(PresentOnlyWhen::new("a", "b", "c"))
            .with_collection_validator(NonEmpty)
            .with_decode_options(DecodeOptions::new().strip_code_fence(true));

        assert_eq!(spec.key(), "groceries");
        assert_eq!(spec.schema().name(), "Item");
        assert_eq!(spec.record_validator().map(|v| v.name()), Some("present_only_when"));
        assert_eq!(spec.collection_validator().map(|v| v.name()), Some("non_empty"));
        assert!(spec.decode_options().strip_code_fence);
        assert!(spec.field_validators().is_empty());

        let debug = format!("{spec:?}");
        assert!(debug.contains("groceries"));
    }

    #[test]
    fn test_spec_defaults() {
        let schema = Schema::builder("Item").string("name", true).build().unwrap();
        let spec = ExtractionSpec::new(schema, "groceries");
        assert!(spec.record_validator().is_none());
        assert!(spec.collection_validator().is_none());
        assert!(!spec.decode_options().strip_code_fence);
    }
}
