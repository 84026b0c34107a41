//! # typedex - Fail-Closed Validation of Structured LLM Output
//!
//! typedex turns the raw text a language model returned into typed, validated
//! records, or into exactly one classified error explaining why it could not.
//! It never calls a model, never retries, and never guesses: JSON wrapped in
//! prose is rejected, missing fields are reported, and values that fail a
//! rule are never coerced into something that passes.
//!
//! ## Quick Start
//!
//! ```rust
//! use typedex::prelude::*;
//! use typedex::rules::NumericString;
//!
//! let schema = Schema::builder("Address")
//!     .string("name", true)
//!     .field(FieldDescriptor::required("street_number", FieldKind::String).validate(NumericString))
//!     .string("street_name", true)
//!     .string("city", true)
//!     .build()
//!     .unwrap();
//!
//! let raw = r#"{"addresses":[{"name":"A","street_number":"1","street_name":"Main","city":"X"}]}"#;
//! let addresses = extract(raw, &schema, "addresses", &FieldValidatorSet::new(), None, None).unwrap();
//! assert_eq!(addresses.len(), 1);
//!
//! let raw = r#"Sure! Here is the JSON: {"addresses": []}"#;
//! let err = extract(raw, &schema, "addresses", &FieldValidatorSet::new(), None, None).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! ```
//!
//! ## Validation Tiers
//!
//! | Tier | Runs on | Failure |
//! |------|---------|---------|
//! | decoder | raw text | `ParseError` |
//! | binder | each item's shape | `SchemaMismatch` (`MissingField`, `NullRequiredField`, `TypeMismatch`) |
//! | field validators | each populated field | `SchemaMismatch` (`FieldValidation`) |
//! | record validator | each bound record | `RecordInconsistency` |
//! | collection validator | the whole batch | `CollectionInconsistency` |
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `catalog` | Address and grocery schemas | ✅ |
//!
//! ## Architecture
//!
//! - [`typedex_core`] - Error taxonomy, field paths, JSON decoder
//! - [`typedex_schema`] - Schemas, records, field validators, binder
//! - [`typedex_output`] - Record and collection validators, pipeline
//! - [`typedex_catalog`] - Ready-made schemas (optional)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// Crate Re-exports
// ============================================================================

pub use typedex_core as core;
pub use typedex_output as output;
pub use typedex_schema as schema;

#[cfg(feature = "catalog")]
#[cfg_attr(docsrs, doc(cfg(feature = "catalog")))]
pub use typedex_catalog as catalog;

pub use typedex_schema::rules;

// ============================================================================
// Type Re-exports
// ============================================================================

pub use typedex_core::{
    decode, decode_with, DecodeOptions, ErrorKind, FieldPath, MismatchKind, Outcome,
    ParseCategory, ParseError, PathSegment, SchemaMismatch, ValidationError, Violation,
};

pub use typedex_schema::{
    bind, bind_record, field_validator, BoxedFieldValidator, FieldDescriptor, FieldKind,
    FieldValidator, FieldValidatorSet, FieldValue, NoOpValidator, Presence, Record,
    RejectValidator, Schema, SchemaBuilder, SchemaError, ValidatorChain,
};

pub use typedex_output::{
    collection_validator, extract, extract_one, extract_one_with, extract_with, record_validator,
    BoxedCollectionValidator, BoxedRecordValidator, Collection, CollectionValidator,
    CollectionValidatorChain, DuplicateCheck, ExtractionSpec, Extractor, MaxRecords, NonEmpty,
    Normalization, PresentOnlyWhen, RecordValidator, RecordValidatorChain,
};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```rust
/// use typedex::prelude::*;
/// ```
pub mod prelude {
    // Errors
    pub use crate::core::{ErrorKind, Outcome, ValidationError};

    // Schemas
    pub use crate::schema::{
        FieldDescriptor, FieldKind, FieldValidator, FieldValidatorSet, FieldValue, Record, Schema,
    };

    // Pipeline
    pub use crate::output::{
        extract, extract_one, Collection, CollectionValidator, DuplicateCheck, ExtractionSpec,
        Extractor, PresentOnlyWhen, RecordValidator,
    };

    // Catalog
    #[cfg(feature = "catalog")]
    pub use crate::catalog::{Address, AddressType, Item};
}

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of typedex.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
