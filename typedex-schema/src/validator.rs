//! Field validators.
//!
//! This module provides the [`FieldValidator`] trait and the combinators used
//! to attach semantic checks to schema fields. Validators run after a value has
//! been type-checked and never see the absent marker.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use typedex_core::Violation;

use crate::record::FieldValue;

/// A pure predicate over one bound field value.
pub trait FieldValidator: Send + Sync {
    /// Short name used in debug output.
    fn name(&self) -> &str;

    /// Check the value, returning the violated rule on failure.
    fn check(&self, value: &FieldValue) -> Result<(), Violation>;
}

/// Shared validator for dynamic dispatch.
pub type BoxedFieldValidator = Arc<dyn FieldValidator>;

impl fmt::Debug for dyn FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldValidator({})", self.name())
    }
}

/// Violation returned when a string rule is attached to a non-string field.
pub(crate) fn expects_string(rule: &str) -> Violation {
    Violation::new("validator.kind", format!("{rule} applies to string values only"))
}

/// Closure-backed validator.
pub struct FnValidator<F> {
    name: String,
    func: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&FieldValue) -> Result<(), Violation> + Send + Sync,
{
    /// Create a new closure validator.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> FieldValidator for FnValidator<F>
where
    F: Fn(&FieldValue) -> Result<(), Violation> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        (self.func)(value)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

/// Helper function to create a validator from a closure.
pub fn field_validator<F>(name: impl Into<String>, func: F) -> FnValidator<F>
where
    F: Fn(&FieldValue) -> Result<(), Violation> + Send + Sync,
{
    FnValidator::new(name, func)
}

/// Chain multiple validators.
///
/// Validators run in order and the first failure is returned.
#[derive(Clone, Default)]
pub struct ValidatorChain {
    validators: Vec<BoxedFieldValidator>,
}

impl ValidatorChain {
    /// Create a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the chain.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add<V: FieldValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Add an Arc-wrapped validator to the chain.
    #[must_use]
    pub fn add_arc(mut self, validator: BoxedFieldValidator) -> Self {
        self.validators.push(validator);
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

impl FieldValidator for ValidatorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        self.validators.iter().try_for_each(|v| v.check(value))
    }
}

impl fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("count", &self.validators.len())
            .finish()
    }
}

/// Validator that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpValidator;

impl FieldValidator for NoOpValidator {
    fn name(&self) -> &str {
        "noop"
    }

    fn check(&self, _value: &FieldValue) -> Result<(), Violation> {
        Ok(())
    }
}

/// Validator that rejects every value.
#[derive(Debug, Clone)]
pub struct RejectValidator {
    message: String,
}

impl RejectValidator {
    /// Create a new reject validator.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RejectValidator {
    fn default() -> Self {
        Self::new("Validation rejected")
    }
}

impl FieldValidator for RejectValidator {
    fn name(&self) -> &str {
        "reject"
    }

    fn check(&self, _value: &FieldValue) -> Result<(), Violation> {
        Err(Violation::new("rejected", self.message.clone()))
    }
}

/// Validators registered against schema fields at call time.
///
/// Keys are `(schema name, field name)`, so the same set can carry rules for
/// nested schemas too. Registered validators run after the ones declared on
/// the field itself, in registration order.
#[derive(Clone, Default)]
pub struct FieldValidatorSet {
    entries: IndexMap<String, IndexMap<String, Vec<BoxedFieldValidator>>>,
}

impl FieldValidatorSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator for a field of a schema.
    #[must_use]
    pub fn register<V: FieldValidator + 'static>(
        self,
        schema: impl Into<String>,
        field: impl Into<String>,
        validator: V,
    ) -> Self {
        self.register_arc(schema, field, Arc::new(validator))
    }

    /// Register an Arc-wrapped validator for a field of a schema.
    #[must_use]
    pub fn register_arc(
        mut self,
        schema: impl Into<String>,
        field: impl Into<String>,
        validator: BoxedFieldValidator,
    ) -> Self {
        self.entries
            .entry(schema.into())
            .or_default()
            .entry(field.into())
            .or_default()
            .push(validator);
        self
    }

    /// Validators registered for a field.
    #[must_use]
    pub fn validators_for(&self, schema: &str, field: &str) -> &[BoxedFieldValidator] {
        self.entries
            .get(schema)
            .and_then(|fields| fields.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(schema, field)` pairs that have validators registered.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(schema, fields)| {
            fields
                .keys()
                .map(move |field| (schema.as_str(), field.as_str()))
        })
    }

    /// Whether no validators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for FieldValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (schema, field) in self.targets() {
            map.entry(
                &format!("{schema}.{field}"),
                &self.validators_for(schema, field).len(),
            );
        }
        map.finish()
    }
}
