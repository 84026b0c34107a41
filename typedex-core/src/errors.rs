//! Error types for typedex.
//!
//! Every way an extraction can fail is classified into exactly one variant of
//! [`ValidationError`]. The taxonomy is closed: callers can match on it
//! exhaustively to decide whether to re-prompt, surface, or discard.
//!
//! - [`ParseError`]: the response was not a single JSON document.
//! - [`SchemaMismatch`]: the decoded tree does not fit the declared schema.
//! - `RecordInconsistency`: a field-valid record breaks a cross-field rule.
//! - `CollectionInconsistency`: the batch breaks a whole-batch rule.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

use crate::path::FieldPath;

/// Result of an extraction.
pub type Outcome<T> = Result<T, ValidationError>;

/// The classified failure returned by the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The response was not syntactically valid JSON.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The decoded tree could not be mapped onto the schema.
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),

    /// A record violates a cross-field rule.
    #[error("Record inconsistency at {path}: {reason}")]
    RecordInconsistency {
        /// Location of the offending record.
        path: FieldPath,
        /// Why the record was rejected.
        reason: String,
    },

    /// The collection violates a whole-batch rule.
    #[error("Collection inconsistency in '{key}': {reason}")]
    CollectionInconsistency {
        /// Top-level key the collection was decoded from.
        key: String,
        /// Why the batch was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// Create a missing field error.
    pub fn missing_field(path: FieldPath) -> Self {
        SchemaMismatch::new(path, MismatchKind::MissingField).into()
    }

    /// Create a null-in-required-field error.
    pub fn null_required(path: FieldPath) -> Self {
        SchemaMismatch::new(path, MismatchKind::NullRequiredField).into()
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        path: FieldPath,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        SchemaMismatch::new(
            path,
            MismatchKind::TypeMismatch {
                expected: expected.into(),
                found: found.into(),
            },
        )
        .into()
    }

    /// Create a field validation error.
    pub fn field_validation(path: FieldPath, value: impl Into<String>, violation: Violation) -> Self {
        SchemaMismatch::new(
            path,
            MismatchKind::FieldValidation {
                value: value.into(),
                violation,
            },
        )
        .into()
    }

    /// Create a record inconsistency error.
    pub fn record_inconsistency(path: FieldPath, reason: impl Into<String>) -> Self {
        Self::RecordInconsistency {
            path,
            reason: reason.into(),
        }
    }

    /// Create a collection inconsistency error.
    pub fn collection_inconsistency(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CollectionInconsistency {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::SchemaMismatch(m) => match m.kind {
                MismatchKind::MissingField => ErrorKind::MissingField,
                MismatchKind::NullRequiredField => ErrorKind::NullRequiredField,
                MismatchKind::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                MismatchKind::FieldValidation { .. } => ErrorKind::FieldValidation,
            },
            Self::RecordInconsistency { .. } => ErrorKind::RecordInconsistency,
            Self::CollectionInconsistency { .. } => ErrorKind::CollectionInconsistency,
        }
    }

    /// Path of the offending value, if the failure is tied to one.
    #[must_use]
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::SchemaMismatch(m) => Some(&m.path),
            Self::RecordInconsistency { path, .. } => Some(path),
            Self::Parse(_) | Self::CollectionInconsistency { .. } => None,
        }
    }

    /// The violated field rule, for `FieldValidation` failures.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::SchemaMismatch(SchemaMismatch {
                kind: MismatchKind::FieldValidation { violation, .. },
                ..
            }) => Some(violation),
            _ => None,
        }
    }
}

/// Flat classification of [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ParseError`].
    Parse,
    /// A required field was absent.
    MissingField,
    /// A required field was explicitly null.
    NullRequiredField,
    /// A field held the wrong JSON kind.
    TypeMismatch,
    /// A field validator rejected the value.
    FieldValidation,
    /// A cross-field rule failed.
    RecordInconsistency,
    /// A whole-batch rule failed.
    CollectionInconsistency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Parse => "parse_error",
            Self::MissingField => "missing_field",
            Self::NullRequiredField => "null_required_field",
            Self::TypeMismatch => "type_mismatch",
            Self::FieldValidation => "field_validation",
            Self::RecordInconsistency => "record_inconsistency",
            Self::CollectionInconsistency => "collection_inconsistency",
        };
        f.write_str(s)
    }
}

/// What went wrong while decoding the raw response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseCategory {
    /// Malformed JSON syntax, including prose before the document.
    Syntax,
    /// Input ended before the document was complete (includes empty input).
    Eof,
    /// A complete document was followed by non-whitespace content.
    TrailingContent,
    /// The document nests deeper than the configured limit.
    DepthExceeded,
}

/// The response was not a single well-formed JSON document.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Failure category.
    pub category: ParseCategory,
    /// Decoder message.
    pub message: String,
    /// 1-based line of the failure, 0 if unknown.
    pub line: usize,
    /// 1-based column of the failure, 0 if unknown.
    pub column: usize,
    /// Byte offset of the failure in the raw response.
    pub offset: Option<usize>,
    /// Text surrounding the failure.
    pub snippet: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse JSON: {}", self.message)?;
        if let Some(offset) = self.offset {
            write!(f, " (byte {offset})")?;
        }
        if let Some(ref snippet) = self.snippet {
            write!(f, " near {snippet:?}")?;
        }
        Ok(())
    }
}

impl ParseError {
    /// Create a parse error without position information.
    pub fn new(category: ParseCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            line: 0,
            column: 0,
            offset: None,
            snippet: None,
        }
    }

    /// Attach a position.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize, offset: Option<usize>) -> Self {
        self.line = line;
        self.column = column;
        self.offset = offset;
        self
    }

    /// Attach a snippet.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// The decoded tree does not fit the schema.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Schema mismatch at {path}: {kind}")]
pub struct SchemaMismatch {
    /// Location of the offending value.
    pub path: FieldPath,
    /// What kind of mismatch occurred.
    pub kind: MismatchKind,
}

impl SchemaMismatch {
    /// Create a new schema mismatch.
    pub fn new(path: FieldPath, kind: MismatchKind) -> Self {
        Self { path, kind }
    }
}

/// Subdivision of [`SchemaMismatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// A required field was absent.
    MissingField,
    /// A required field was present but null.
    NullRequiredField,
    /// The field held the wrong kind of value.
    TypeMismatch {
        /// Kind the schema declares.
        expected: String,
        /// Kind found in the response.
        found: String,
    },
    /// A field validator rejected the value.
    FieldValidation {
        /// The offending raw value, rendered as JSON.
        value: String,
        /// The rule that was violated.
        violation: Violation,
    },
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("missing required field"),
            Self::NullRequiredField => f.write_str("required field is null"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::FieldValidation { value, violation } => {
                write!(f, "value {value} rejected: {violation}")
            }
        }
    }
}

/// A specific field rule violation.
///
/// `code` is a stable machine-readable identifier such as
/// `postal_code.first_letter`; `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable identifier of the violated rule.
    pub code: Cow<'static, str>,
    /// Human-readable explanation.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_kind_and_path() {
        let err = ValidationError::missing_field(FieldPath::field("addresses").index(0).key("city"));
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.path().unwrap().leaf(), Some("city"));
        assert!(err.to_string().contains("addresses[0].city"));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ValidationError::type_mismatch(FieldPath::field("quantity"), "integer", "string");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let msg = err.to_string();
        assert!(msg.contains("expected integer"));
        assert!(msg.contains("found string"));
    }

    #[test]
    fn test_field_validation_carries_violation() {
        let violation = Violation::new("numeric.non_digit", "must contain only digits");
        let err = ValidationError::field_validation(
            FieldPath::field("street_number"),
            "\"ABC\"",
            violation.clone(),
        );
        assert_eq!(err.kind(), ErrorKind::FieldValidation);
        assert_eq!(err.violation(), Some(&violation));
        assert!(err.to_string().contains("\"ABC\""));
        assert!(err.to_string().contains("numeric.non_digit"));
    }

    #[test]
    fn test_record_inconsistency() {
        let err = ValidationError::record_inconsistency(
            FieldPath::field("addresses").index(1),
            "unit requires residential address",
        );
        assert_eq!(err.kind(), ErrorKind::RecordInconsistency);
        assert!(err.to_string().contains("addresses[1]"));
    }

    #[test]
    fn test_collection_inconsistency_has_no_path() {
        let err = ValidationError::collection_inconsistency("addresses", "duplicate record");
        assert_eq!(err.kind(), ErrorKind::CollectionInconsistency);
        assert!(err.path().is_none());
        assert!(err.violation().is_none());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(ParseCategory::Syntax, "expected value")
            .at(1, 1, Some(0))
            .with_snippet("Sure!");
        let msg = ValidationError::from(err).to_string();
        assert!(msg.contains("expected value"));
        assert!(msg.contains("byte 0"));
        assert!(msg.contains("Sure!"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::FieldValidation.to_string(), "field_validation");
        assert_eq!(ErrorKind::Parse.to_string(), "parse_error");
    }
}
