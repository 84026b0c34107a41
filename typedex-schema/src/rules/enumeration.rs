//! Enum membership rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use typedex_core::Violation;

use crate::record::FieldValue;
use crate::validator::{expects_string, FieldValidator};

/// A named, closed set of string variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariants {
    name: String,
    variants: Vec<String>,
}

impl EnumVariants {
    /// Create a variant set.
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the enum.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Whether `value` is exactly one of the variants.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.variants.iter().any(|v| v == value)
    }
}

impl fmt::Display for EnumVariants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.name, self.variants.join(", "))
    }
}

/// Value must equal one of a fixed set of variants. Matching is exact.
#[derive(Debug, Clone)]
pub struct EnumMembership {
    variants: Arc<EnumVariants>,
}

impl EnumMembership {
    /// Create a membership check.
    pub fn new(variants: impl Into<Arc<EnumVariants>>) -> Self {
        Self {
            variants: variants.into(),
        }
    }
}

impl FieldValidator for EnumMembership {
    fn name(&self) -> &str {
        "enum_membership"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value.as_str().ok_or_else(|| expects_string("enum_membership"))?;
        if self.variants.contains(s) {
            return Ok(());
        }
        Err(Violation::new(
            "enum.unknown_variant",
            format!(
                "'{s}' is not a valid {}; expected one of: {}",
                self.variants.name(),
                self.variants.variants().join(", ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_type() -> EnumVariants {
        EnumVariants::new("AddressType", ["residential", "commercial"])
    }

    #[test]
    fn test_membership() {
        let check = EnumMembership::new(address_type());
        assert!(check.check(&FieldValue::Enum("residential".into())).is_ok());
        assert!(check.check(&FieldValue::String("commercial".into())).is_ok());
    }

    #[test]
    fn test_unknown_variant_names_value_and_set() {
        let check = EnumMembership::new(address_type());
        let err = check.check(&FieldValue::Enum("industrial".into())).unwrap_err();
        assert_eq!(err.code, "enum.unknown_variant");
        assert!(err.message.contains("'industrial'"));
        assert!(err.message.contains("residential, commercial"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let check = EnumMembership::new(address_type());
        assert!(check.check(&FieldValue::Enum("Residential".into())).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            address_type().to_string(),
            "AddressType {residential, commercial}"
        );
    }
}
