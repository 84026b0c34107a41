//! Built-in field rules.
//!
//! Each rule is a [`FieldValidator`](crate::validator::FieldValidator) with
//! stable violation codes, so callers can tell which constraint failed without
//! parsing messages.

mod enumeration;
mod numeric;
mod postal_code;
mod range;
mod text;

pub use enumeration::{EnumMembership, EnumVariants};
pub use numeric::{check_numeric_string, NumericString};
pub use postal_code::{check_postal_code, normalize_postal_code, CanadianPostalCode};
pub use range::IntegerRange;
pub use text::{LengthBounds, NonBlank, PatternValidator};
