//! Canadian postal code rule.
//!
//! A postal code has the shape `A1A 1A1`. Input is normalized by removing
//! whitespace and uppercasing before any check, so `k1a1a1` is accepted.
//! Letters in the first position may not be `D F I O`; letters in the third
//! and fifth positions may not be `D F I O Q U`.

use typedex_core::Violation;

use crate::record::FieldValue;
use crate::validator::{expects_string, FieldValidator};

const FIRST_LETTER_EXCLUDED: &[char] = &['D', 'F', 'I', 'O'];
const LATER_LETTER_EXCLUDED: &[char] = &['D', 'F', 'I', 'O', 'Q', 'U'];

/// Remove all whitespace and uppercase.
#[must_use]
pub fn normalize_postal_code(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Check a Canadian postal code.
///
/// # Errors
///
/// One of `postal_code.format`, `postal_code.first_letter`,
/// `postal_code.third_letter`, `postal_code.fifth_letter`.
pub fn check_postal_code(value: &str) -> Result<(), Violation> {
    let normalized = normalize_postal_code(value);
    let chars: Vec<char> = normalized.chars().collect();

    let well_formed = chars.len() == 6
        && chars.iter().enumerate().all(|(i, c)| {
            if i % 2 == 0 {
                c.is_ascii_uppercase()
            } else {
                c.is_ascii_digit()
            }
        });
    if !well_formed {
        return Err(Violation::new(
            "postal_code.format",
            "must be in format 'A1A 1A1' where A is a letter and 1 is a digit",
        ));
    }

    let letter_rules = [
        (0, FIRST_LETTER_EXCLUDED, "postal_code.first_letter", "first"),
        (2, LATER_LETTER_EXCLUDED, "postal_code.third_letter", "third"),
        (4, LATER_LETTER_EXCLUDED, "postal_code.fifth_letter", "fifth"),
    ];
    for (idx, excluded, code, ordinal) in letter_rules {
        if excluded.contains(&chars[idx]) {
            return Err(Violation::new(
                code,
                format!(
                    "'{}' is not allowed as the {ordinal} letter of a postal code",
                    chars[idx]
                ),
            ));
        }
    }
    Ok(())
}

/// String field holding a Canadian postal code.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanadianPostalCode;

impl FieldValidator for CanadianPostalCode {
    fn name(&self) -> &str {
        "canadian_postal_code"
    }

    fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        let s = value
            .as_str()
            .ok_or_else(|| expects_string("canadian_postal_code"))?;
        check_postal_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("K1A 1A1")]
    #[case("k1a1a1")]
    #[case("  m5j 2r8 ")]
    #[case("K1P\t5M2")]
    fn test_valid(#[case] input: &str) {
        assert!(check_postal_code(input).is_ok());
    }

    #[rstest]
    #[case("D1A 1A1", "postal_code.first_letter")]
    #[case("O1A 1A1", "postal_code.first_letter")]
    #[case("K1D 1A1", "postal_code.third_letter")]
    #[case("K1Q 1A1", "postal_code.third_letter")]
    #[case("K1A 1U1", "postal_code.fifth_letter")]
    #[case("K1A 1I1", "postal_code.fifth_letter")]
    #[case("ABC 123", "postal_code.format")]
    #[case("K1A 1A", "postal_code.format")]
    #[case("K1A 1A1 1", "postal_code.format")]
    #[case("", "postal_code.format")]
    #[case("É1A 1A1", "postal_code.format")]
    fn test_invalid(#[case] input: &str, #[case] code: &str) {
        let err = check_postal_code(input).unwrap_err();
        assert_eq!(err.code, code);
    }

    #[test]
    fn test_first_letter_allows_q_and_u() {
        // Q and U are only excluded from the third and fifth positions.
        assert!(check_postal_code("Q1A 1A1").is_ok());
        assert!(check_postal_code("U1A 1A1").is_ok());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_postal_code(" k1a 1a1 "), "K1A1A1");
    }

    #[test]
    fn test_message_names_letter() {
        let err = check_postal_code("K1D 1A1").unwrap_err();
        assert!(err.message.contains("'D'"));
        assert!(err.message.contains("third"));
    }
}
