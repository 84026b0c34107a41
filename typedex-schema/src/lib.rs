//! # typedex-schema
//!
//! Schemas, records, and field validation for typedex.
//!
//! This crate turns a decoded JSON tree into a validated [`Record`]:
//!
//! - **[`Schema`]**: ordered field declarations built with [`SchemaBuilder`]
//! - **[`FieldKind`]**: string, integer, number, boolean, enum, nested record, list
//! - **[`FieldValidator`]**: per-field semantic predicates, composable via [`ValidatorChain`]
//! - **[`rules`]**: built-in rules (numeric strings, Canadian postal codes, enums, ranges, text)
//! - **[`binder`]**: the schema-bound deserializer
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use typedex_schema::{bind, FieldDescriptor, FieldKind, Schema};
//! use typedex_schema::rules::NumericString;
//!
//! let schema = Schema::builder("Address")
//!     .string("name", true)
//!     .field(FieldDescriptor::required("street_number", FieldKind::String).validate(NumericString))
//!     .build()
//!     .unwrap();
//!
//! let record = bind(&json!({"name": "Library", "street_number": "150"}), &schema).unwrap();
//! assert_eq!(record.get_str("street_number"), Some("150"));
//!
//! let err = bind(&json!({"name": "Library", "street_number": "ABC"}), &schema).unwrap_err();
//! assert_eq!(err.violation().unwrap().code, "numeric.non_digit");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod binder;
pub mod kind;
pub mod record;
pub mod rules;
pub mod schema;
pub mod validator;

pub use binder::{bind, bind_record};
pub use kind::FieldKind;
pub use record::{FieldValue, Record};
pub use schema::{FieldDescriptor, Presence, Schema, SchemaBuilder, SchemaError};
pub use validator::{
    field_validator, BoxedFieldValidator, FieldValidator, FieldValidatorSet, FnValidator,
    NoOpValidator, RejectValidator, ValidatorChain,
};
