//! Numeric string rule.

use typedex_core::Violation;

use crate::record::FieldValue;
use crate::validator::{expects_string, FieldValidator};

/// Check that `value`, with all whitespace removed, is a non-empty run of
/// ASCII decimal digits.
///
/// # Errors
///
/// `numeric.empty` if nothing is left after stripping whitespace,
/// `numeric.non_digit` if any other character remains.
pub fn check_numeric_string(value: &str) -> Result<(), Violation> {
    let mut seen = false;
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if !c.is_ascii_digit() {
            return Err(Violation::new(
                "numeric.non_digit",
                format!("'{c}' is not a decimal digit"),
            ));
        }
        seen = true;
    }
    if !seen {
        return Err(Violation::new(
            "numeric.empty",
            "value is empty after removing whitespace",
        ));
    }
    Ok(())
}

/// String field that must hold only decimal digits, e.g. a street number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericString;

impl FieldValidator for NumericString {
    fn name(&self) -> &str {
        "numeric_string"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value.as_str().ok_or_else(|| expects_string("numeric_string"))?;
        check_numeric_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123")]
    #[case("12 3")]
    #[case(" 1 2 3 ")]
    #[case("0")]
    fn test_valid(#[case] input: &str) {
        assert!(check_numeric_string(input).is_ok());
    }

    #[rstest]
    #[case("ABC", "numeric.non_digit")]
    #[case("12A", "numeric.non_digit")]
    #[case("-1", "numeric.non_digit")]
    #[case("١٢", "numeric.non_digit")]
    #[case("", "numeric.empty")]
    #[case("   ", "numeric.empty")]
    fn test_invalid(#[case] input: &str, #[case] code: &str) {
        let err = check_numeric_string(input).unwrap_err();
        assert_eq!(err.code, code);
    }

    #[test]
    fn test_rejects_non_string_values() {
        let err = NumericString.check(&FieldValue::Integer(12)).unwrap_err();
        assert_eq!(err.code, "validator.kind");
    }
}
