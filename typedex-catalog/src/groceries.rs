//! Grocery list schema.

use serde::{Deserialize, Serialize};
use typedex_output::{ExtractionSpec, Extractor};
use typedex_schema::rules::{IntegerRange, NonBlank};
use typedex_schema::{FieldDescriptor, FieldKind, Schema, SchemaError};

/// Collection key grocery responses are nested under.
pub const GROCERIES_KEY: &str = "groceries";

/// Typed view of a grocery item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// What to buy.
    pub name: String,
    /// How many.
    pub quantity: i64,
}

/// `Item` with a non-blank `name` and a non-negative integer `quantity`.
pub fn item_schema() -> Result<Schema, SchemaError> {
    Schema::builder("Item")
        .description("One line of a grocery list")
        .field(FieldDescriptor::required("name", FieldKind::String).validate(NonBlank))
        .field(
            FieldDescriptor::required("quantity", FieldKind::Integer)
                .validate(IntegerRange::non_negative()),
        )
        .build()
}

/// Extractor for grocery lists.
pub fn groceries_extractor() -> Result<Extractor, SchemaError> {
    Ok(Extractor::new(ExtractionSpec::new(item_schema()?, GROCERIES_KEY)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use typedex_core::ErrorKind;

    #[test]
    fn test_grocery_list() {
        let raw = r#"{"groceries": [
            {"name": "eggs", "quantity": 12},
            {"name": "bottle of milk", "quantity": 2},
            {"name": "sparkling water", "quantity": 6}
        ]}"#;
        let items: Vec<Item> = groceries_extractor()
            .unwrap()
            .extract(raw)
            .unwrap()
            .deserialize_into()
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0],
            Item {
                name: "eggs".into(),
                quantity: 12
            }
        );
    }

    #[rstest]
    #[case::negative(r#"{"name": "eggs", "quantity": -1}"#, ErrorKind::FieldValidation)]
    #[case::fractional(r#"{"name": "apples", "quantity": 2.5}"#, ErrorKind::TypeMismatch)]
    #[case::stringly(r#"{"name": "apples", "quantity": "few"}"#, ErrorKind::TypeMismatch)]
    #[case::blank_name(r#"{"name": "  ", "quantity": 1}"#, ErrorKind::FieldValidation)]
    #[case::missing_quantity(r#"{"name": "bread"}"#, ErrorKind::MissingField)]
    fn test_invalid_items(#[case] item: &str, #[case] kind: ErrorKind) {
        let raw = format!(r#"{{"groceries": [{item}]}}"#);
        let err = groceries_extractor().unwrap().extract(&raw).unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_model_chosen_shape_is_rejected() {
        // Without a schema in the prompt models pick their own layout.
        let raw = r#"{"items": ["bread", "eggs", "apples", "milk"]}"#;
        let err = groceries_extractor().unwrap().extract(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn test_markdown_wrapped_json_is_rejected_by_default() {
        let raw = "```json\n{\"groceries\": []}\n```";
        let err = groceries_extractor().unwrap().extract(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
