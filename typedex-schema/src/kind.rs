//! Value kinds a schema field can declare.

use std::fmt;
use std::sync::Arc;

use crate::record::FieldValue;
use crate::rules::EnumVariants;
use crate::schema::Schema;

/// The kind of value a field holds.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// JSON integer that fits in an `i64`.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON string restricted to a fixed set of variants.
    Enum(Arc<EnumVariants>),
    /// JSON object bound against a nested schema.
    Record(Arc<Schema>),
    /// JSON array whose elements all have the inner kind.
    List(Box<FieldKind>),
}

impl FieldKind {
    /// Enum kind from a variant set.
    #[must_use]
    pub fn enumeration(variants: EnumVariants) -> Self {
        Self::Enum(Arc::new(variants))
    }

    /// Nested record kind.
    #[must_use]
    pub fn record(schema: impl Into<Arc<Schema>>) -> Self {
        Self::Record(schema.into())
    }

    /// List kind.
    #[must_use]
    pub fn list(inner: FieldKind) -> Self {
        Self::List(Box::new(inner))
    }

    /// Whether a bound value is of this kind. `Absent` never matches.
    #[must_use]
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::String, FieldValue::String(_))
            | (Self::Integer, FieldValue::Integer(_))
            | (Self::Number, FieldValue::Number(_))
            | (Self::Boolean, FieldValue::Boolean(_)) => true,
            (Self::Enum(variants), FieldValue::Enum(v)) => variants.contains(v),
            (Self::Record(schema), FieldValue::Record(r)) => r.schema_name() == schema.name(),
            (Self::List(inner), FieldValue::List(items)) => items.iter().all(|i| inner.accepts(i)),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Enum(variants) => write!(f, "string ({})", variants.name()),
            Self::Record(schema) => write!(f, "object ({})", schema.name()),
            Self::List(inner) => write!(f, "array of {inner}"),
        }
    }
}
