//! Record validators.
//!
//! A record validator checks relationships between fields of a record whose
//! fields are already individually valid. Field-level validity does not imply
//! the fields agree with each other.

use std::fmt;
use std::sync::Arc;
use typedex_schema::Record;

/// A cross-field consistency check over one record.
pub trait RecordValidator: Send + Sync {
    /// Short name used in debug output.
    fn name(&self) -> &str;

    /// Check the record, returning the reason on failure.
    fn check(&self, record: &Record) -> Result<(), String>;
}

/// Shared record validator for dynamic dispatch.
pub type BoxedRecordValidator = Arc<dyn RecordValidator>;

impl fmt::Debug for dyn RecordValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordValidator({})", self.name())
    }
}

/// Closure-backed record validator.
pub struct FnRecordValidator<F> {
    name: String,
    func: F,
}

impl<F> FnRecordValidator<F>
where
    F: Fn(&Record) -> Result<(), String> + Send + Sync,
{
    /// Create a new closure validator.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> RecordValidator for FnRecordValidator<F>
where
    F: Fn(&Record) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &Record) -> Result<(), String> {
        (self.func)(record)
    }
}

impl<F> fmt::Debug for FnRecordValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRecordValidator")
            .field("name", &self.name)
            .finish()
    }
}

/// Helper function to create a record validator from a closure.
pub fn record_validator<F>(name: impl Into<String>, func: F) -> FnRecordValidator<F>
where
    F: Fn(&Record) -> Result<(), String> + Send + Sync,
{
    FnRecordValidator::new(name, func)
}

/// A field may only be present when another field holds a given value.
///
/// For example, a `unit` sub-record is only meaningful when `address_type` is
/// `residential`.
#[derive(Debug, Clone)]
pub struct PresentOnlyWhen {
    field: String,
    other: String,
    expected: String,
}

impl PresentOnlyWhen {
    /// `field` may be non-absent only if `other` equals `expected`.
    pub fn new(
        field: impl Into<String>,
        other: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            other: other.into(),
            expected: expected.into(),
        }
    }
}

impl RecordValidator for PresentOnlyWhen {
    fn name(&self) -> &str {
        "present_only_when"
    }

    fn check(&self, record: &Record) -> Result<(), String> {
        let present = record.get(&self.field).is_some_and(|v| !v.is_absent());
        if !present {
            return Ok(());
        }
        match record.get_str(&self.other) {
            Some(actual) if actual == self.expected => Ok(()),
            actual => Err(format!(
                "'{}' is only allowed when '{}' is '{}', found {}",
                self.field,
                self.other,
                self.expected,
                actual.map_or_else(|| "nothing".to_string(), |a| format!("'{a}'")),
            )),
        }
    }
}

/// Chain multiple record validators; the first failure is returned.
#[derive(Clone, Default)]
pub struct RecordValidatorChain {
    validators: Vec<BoxedRecordValidator>,
}

impl RecordValidatorChain {
    /// Create a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the chain.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add<V: RecordValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Get the number of validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl RecordValidator for RecordValidatorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn check(&self, record: &Record) -> Result<(), String> {
        self.validators.iter().try_for_each(|v| v.check(record))
    }
}

impl fmt::Debug for RecordValidatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordValidatorChain")
            .field("count", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typedex_schema::rules::EnumVariants;
    use typedex_schema::{bind, Schema};

    fn schema() -> Schema {
        let unit = Schema::builder("ResidentialUnit")
            .string("unit_number", true)
            .build()
            .unwrap();
        Schema::builder("Address")
            .string("name", true)
            .enumeration(
                "address_type",
                EnumVariants::new("AddressType", ["residential", "commercial"]),
                false,
            )
            .record("unit", unit, false)
            .build()
            .unwrap()
    }

    fn unit_rule() -> PresentOnlyWhen {
        PresentOnlyWhen::new("unit", "address_type", "residential")
    }

    #[test]
    fn test_present_only_when_passes() {
        let s = schema();
        let with_unit = bind(
            &json!({"name": "A", "address_type": "residential", "unit": {"unit_number": "4B"}}),
            &s,
        )
        .unwrap();
        assert!(unit_rule().check(&with_unit).is_ok());

        let without_unit = bind(&json!({"name": "B", "address_type": "commercial"}), &s).unwrap();
        assert!(unit_rule().check(&without_unit).is_ok());
    }

    #[test]
    fn test_present_only_when_fails() {
        let s = schema();
        let record = bind(
            &json!({"name": "A", "address_type": "commercial", "unit": {"unit_number": "302"}}),
            &s,
        )
        .unwrap();
        let reason = unit_rule().check(&record).unwrap_err();
        assert!(reason.contains("'commercial'"));

        let record = bind(&json!({"name": "A", "unit": {"unit_number": "302"}}), &s).unwrap();
        let reason = unit_rule().check(&record).unwrap_err();
        assert!(reason.contains("found nothing"));
    }

    #[test]
    fn test_chain_and_closure() {
        let s = schema();
        let record = bind(&json!({"name": ""}), &s).unwrap();
        let chain = RecordValidatorChain::new()
            .add(unit_rule())
            .add(record_validator("named", |r: &Record| {
                if r.get_str("name").is_some_and(|n| !n.is_empty()) {
                    Ok(())
                } else {
                    Err("name is empty".to_string())
                }
            }));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.check(&record).unwrap_err(), "name is empty");
    }
}
