//! Text constraints: length bounds, regex patterns, non-blank strings.

use regex::Regex;
use typedex_core::Violation;

use crate::record::FieldValue;
use crate::schema::SchemaError;
use crate::validator::{expects_string, FieldValidator};

/// String length bounds, counted in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthBounds {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthBounds {
    /// No bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum length.
    #[must_use]
    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min = Some(len);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max = Some(len);
        self
    }
}

impl FieldValidator for LengthBounds {
    fn name(&self) -> &str {
        "length_bounds"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value.as_str().ok_or_else(|| expects_string("length_bounds"))?;
        let len = s.chars().count();

        if let Some(min) = self.min {
            if len < min {
                return Err(Violation::new(
                    "length.too_short",
                    format!("length {len} is below allowed {min}"),
                ));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                return Err(Violation::new(
                    "length.too_long",
                    format!("length {len} is above allowed {max}"),
                ));
            }
        }

        Ok(())
    }
}

/// String must match a regex.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
}

impl PatternValidator {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl FieldValidator for PatternValidator {
    fn name(&self) -> &str {
        "pattern"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value.as_str().ok_or_else(|| expects_string("pattern"))?;
        if self.pattern.is_match(s) {
            Ok(())
        } else {
            Err(Violation::new(
                "pattern.mismatch",
                format!("does not match required pattern: {}", self.pattern.as_str()),
            ))
        }
    }
}

/// String must contain at least one non-whitespace character.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonBlank;

impl FieldValidator for NonBlank {
    fn name(&self) -> &str {
        "non_blank"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value.as_str().ok_or_else(|| expects_string("non_blank"))?;
        if s.trim().is_empty() {
            return Err(Violation::new("text.blank", "must not be blank"));
        }
        Ok(())
    }
}
