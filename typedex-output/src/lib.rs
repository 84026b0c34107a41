//! # typedex-output
//!
//! Record and collection validation plus the extraction pipeline for typedex.
//!
//! This crate takes a raw model response all the way to a validated
//! [`Collection`] or one classified [`ValidationError`](typedex_core::ValidationError).
//!
//! ## Core Concepts
//!
//! - **[`extract`]**: the pipeline entry point (decode, bind, record rules, collection rules)
//! - **[`extract_one`]**: the same for a response whose root object is the record
//! - **[`RecordValidator`]**: cross-field consistency checks on one record
//! - **[`CollectionValidator`]**: whole-batch checks such as [`DuplicateCheck`]
//! - **[`ExtractionSpec`]** / **[`Extractor`]**: a reusable, shareable bundle of all of the above
//!
//! ## Example
//!
//! ```rust
//! use typedex_output::{DuplicateCheck, ExtractionSpec, Extractor};
//! use typedex_core::ErrorKind;
//! use typedex_schema::Schema;
//!
//! let schema = Schema::builder("Item")
//!     .string("name", true)
//!     .integer("quantity", true)
//!     .build()
//!     .unwrap();
//!
//! let extractor = Extractor::new(
//!     ExtractionSpec::new(schema, "groceries")
//!         .with_collection_validator(DuplicateCheck::on(["name"])),
//! );
//!
//! let items = extractor
//!     .extract(r#"{"groceries": [{"name": "eggs", "quantity": 12}]}"#)
//!     .unwrap();
//! assert_eq!(items.records()[0].get_i64("quantity"), Some(12));
//!
//! let err = extractor.extract("Here you go: {}").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod collection;
pub mod pipeline;
pub mod record;
pub mod spec;

// Re-exports
pub use collection::{
    collection_validator, BoxedCollectionValidator, Collection, CollectionValidator,
    CollectionValidatorChain, DuplicateCheck, FnCollectionValidator, MaxRecords, NonEmpty,
    Normalization,
};
pub use pipeline::{extract, extract_one, extract_one_with, extract_with, Extractor};
pub use record::{
    record_validator, BoxedRecordValidator, FnRecordValidator, PresentOnlyWhen, RecordValidator,
    RecordValidatorChain,
};
pub use spec::ExtractionSpec;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        extract, extract_one, Collection, CollectionValidator, DuplicateCheck, ExtractionSpec,
        Extractor, NonEmpty, PresentOnlyWhen, RecordValidator,
    };
}
