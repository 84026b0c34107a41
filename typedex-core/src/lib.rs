//! # typedex-core
//!
//! Core types for the typedex extraction pipeline.
//!
//! This crate provides the pieces every other typedex crate builds on:
//!
//! - **Errors**: the closed [`ValidationError`] taxonomy returned on failure
//! - **Paths**: [`FieldPath`] for locating offending values
//! - **Decoder**: strict single-document JSON decoding of raw model responses
//!
//! ## Example
//!
//! ```rust
//! use typedex_core::{decode, ErrorKind, ValidationError};
//!
//! let err: ValidationError = decode("not json").unwrap_err().into();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod errors;
pub mod path;

pub use decoder::{decode, decode_with, kind_name, DecodeOptions, DEFAULT_SNIPPET_RADIUS};
pub use errors::{
    ErrorKind, MismatchKind, Outcome, ParseCategory, ParseError, SchemaMismatch, ValidationError,
    Violation,
};
pub use path::{FieldPath, PathSegment};
