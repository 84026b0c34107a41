//! Schema declarations.
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s declared ahead of
//! time. It is immutable once built and cheap to share behind an `Arc`, so
//! nested schemas can be referenced from many parents.
//!
//! # Example
//!
//! ```rust
//! use typedex_schema::{FieldDescriptor, FieldKind, Schema};
//! use typedex_schema::rules::NumericString;
//!
//! let schema = Schema::builder("Address")
//!     .string("name", true)
//!     .field(FieldDescriptor::required("street_number", FieldKind::String).validate(NumericString))
//!     .string("street_name", true)
//!     .string("city", true)
//!     .string("postal_code", false)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.fields().len(), 5);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::kind::FieldKind;
use crate::record::FieldValue;
use crate::rules::EnumVariants;
use crate::validator::{BoxedFieldValidator, FieldValidator};

/// Problems found while declaring a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two fields share a name.
    #[error("Duplicate field '{field}' in schema '{schema}'")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// Field name.
        field: String,
    },

    /// A schema or field name is empty.
    #[error("Empty name in schema '{0}'")]
    EmptyName(String),

    /// An enum declares no variants.
    #[error("Enum '{0}' has no variants")]
    EmptyEnum(String),

    /// A default does not fit the field's kind.
    #[error("Default for field '{field}' is not a valid {expected}")]
    InvalidDefault {
        /// Field name.
        field: String,
        /// Declared kind.
        expected: String,
    },

    /// A default fails one of the field's declared validators.
    #[error("Default for field '{field}' is rejected by '{validator}': {reason}")]
    RejectedDefault {
        /// Field name.
        field: String,
        /// Name of the rejecting validator.
        validator: String,
        /// Violation message.
        reason: String,
    },

    /// A default holds a nested record. Nested records must come from the
    /// response so that they pass through the nested schema.
    #[error("Field '{field}' cannot default to a nested record")]
    RecordDefault {
        /// Field name.
        field: String,
    },

    /// A regex rule failed to compile.
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Whether a field must be present.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// Missing or null is a schema mismatch.
    Required,
    /// Missing or null binds `default`, or [`FieldValue::Absent`] if none.
    Optional {
        /// Value bound when the field is missing or null.
        default: Option<FieldValue>,
    },
}

/// One field of a schema.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    presence: Presence,
    description: Option<String>,
    validators: Vec<BoxedFieldValidator>,
}

impl FieldDescriptor {
    /// A required field.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, Presence::Required)
    }

    /// An optional field that binds [`FieldValue::Absent`] when missing.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, Presence::Optional { default: None })
    }

    fn new(name: impl Into<String>, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name: name.into(),
            kind,
            presence,
            description: None,
            validators: Vec::new(),
        }
    }

    /// Make the field optional with a default bound when missing.
    #[must_use]
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.presence = Presence::Optional {
            default: Some(default),
        };
        self
    }

    /// Attach a validator. Validators run in attachment order.
    #[must_use]
    pub fn validate<V: FieldValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Attach an Arc-wrapped validator.
    #[must_use]
    pub fn validate_arc(mut self, validator: BoxedFieldValidator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Set a description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Presence rule.
    #[must_use]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attached validators.
    #[must_use]
    pub fn validators(&self) -> &[BoxedFieldValidator] {
        &self.validators
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind.to_string())
            .field("presence", &self.presence)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Declarative description of a record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: Arc<str>,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a fully specified field.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    fn simple(self, name: &str, kind: FieldKind, required: bool) -> Self {
        let descriptor = if required {
            FieldDescriptor::required(name, kind)
        } else {
            FieldDescriptor::optional(name, kind)
        };
        self.field(descriptor)
    }

    /// Add a string field.
    #[must_use]
    pub fn string(self, name: &str, required: bool) -> Self {
        self.simple(name, FieldKind::String, required)
    }

    /// Add an integer field.
    #[must_use]
    pub fn integer(self, name: &str, required: bool) -> Self {
        self.simple(name, FieldKind::Integer, required)
    }

    /// Add a number field.
    #[must_use]
    pub fn number(self, name: &str, required: bool) -> Self {
        self.simple(name, FieldKind::Number, required)
    }

    /// Add a boolean field.
    #[must_use]
    pub fn boolean(self, name: &str, required: bool) -> Self {
        self.simple(name, FieldKind::Boolean, required)
    }

    /// Add an enum field.
    #[must_use]
    pub fn enumeration(self, name: &str, variants: EnumVariants, required: bool) -> Self {
        self.simple(name, FieldKind::enumeration(variants), required)
    }

    /// Add a nested record field.
    #[must_use]
    pub fn record(self, name: &str, schema: impl Into<Arc<Schema>>, required: bool) -> Self {
        self.simple(name, FieldKind::record(schema), required)
    }

    /// Add a list field.
    #[must_use]
    pub fn list(self, name: &str, items: FieldKind, required: bool) -> Self {
        self.simple(name, FieldKind::list(items), required)
    }

    /// Check the declaration and build the schema.
    ///
    /// # Errors
    ///
    /// Returns an error for empty names, duplicate field names and enums
    /// without variants. Defaults must fit their field's kind, must not hold
    /// a nested record, and must pass the field's declared validators.
    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName(self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyName(self.name));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            check_enums(&field.kind)?;
            if let Presence::Optional {
                default: Some(ref default),
            } = field.presence
            {
                check_default(field, default)?;
            }
        }

        Ok(Schema {
            name: Arc::from(self.name),
            description: self.description,
            fields: self.fields,
        })
    }
}

fn check_default(field: &FieldDescriptor, default: &FieldValue) -> Result<(), SchemaError> {
    if holds_record(default) {
        return Err(SchemaError::RecordDefault {
            field: field.name.clone(),
        });
    }
    if !field.kind.accepts(default) {
        return Err(SchemaError::InvalidDefault {
            field: field.name.clone(),
            expected: field.kind.to_string(),
        });
    }
    for validator in &field.validators {
        if let Err(violation) = validator.check(default) {
            return Err(SchemaError::RejectedDefault {
                field: field.name.clone(),
                validator: validator.name().to_string(),
                reason: violation.message,
            });
        }
    }
    Ok(())
}

fn holds_record(value: &FieldValue) -> bool {
    match value {
        FieldValue::Record(_) => true,
        FieldValue::List(items) => items.iter().any(holds_record),
        _ => false,
    }
}

fn check_enums(kind: &FieldKind) -> Result<(), SchemaError> {
    match kind {
        FieldKind::Enum(variants) if variants.variants().is_empty() => {
            Err(SchemaError::EmptyEnum(variants.name().to_string()))
        }
        FieldKind::List(inner) => check_enums(inner),
        _ => Ok(()),
    }
}
