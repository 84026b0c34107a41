//! Integer range rule.

use typedex_core::Violation;

use crate::record::FieldValue;
use crate::validator::FieldValidator;

/// Integer field bounded on either side (inclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerRange {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerRange {
    /// No bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values must be `>= 0`.
    #[must_use]
    pub fn non_negative() -> Self {
        Self::new().min(0)
    }

    /// Set the inclusive lower bound.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive upper bound.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl FieldValidator for IntegerRange {
    fn name(&self) -> &str {
        "integer_range"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let n = value.as_i64().ok_or_else(|| {
            Violation::new("validator.kind", "integer_range applies to integer values only")
        })?;
        if let Some(min) = self.min {
            if n < min {
                return Err(Violation::new(
                    "range.below_min",
                    format!("{n} is below the minimum {min}"),
                ));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(Violation::new(
                    "range.above_max",
                    format!("{n} is above the maximum {max}"),
                ));
            }
        }
        Ok(())
    }
}
