//! Address schemas.
//!
//! Two address shapes are provided. The basic one has four required strings.
//! The full one adds a validated Canadian postal code, an address
//! classification, optional unit details, and a record rule tying the unit
//! sub-record to residential addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use typedex_output::{DuplicateCheck, ExtractionSpec, Extractor, PresentOnlyWhen};
use typedex_schema::rules::{CanadianPostalCode, EnumVariants, NumericString};
use typedex_schema::{FieldDescriptor, FieldKind, Schema, SchemaError};

/// Collection key address responses are nested under.
pub const ADDRESSES_KEY: &str = "addresses";

/// Classification of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Houses and apartments.
    Residential,
    /// Offices, libraries, malls and other businesses.
    Commercial,
}

impl AddressType {
    /// All variants in declaration order.
    pub const ALL: [AddressType; 2] = [AddressType::Residential, AddressType::Commercial];

    /// Wire name of the variant.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::Residential => "residential",
            AddressType::Commercial => "commercial",
        }
    }

    /// Whether an occupant at this address needs a business license.
    #[must_use]
    pub fn requires_business_license(self) -> bool {
        matches!(self, AddressType::Commercial)
    }

    /// Variant set for schema declarations.
    #[must_use]
    pub fn variants() -> EnumVariants {
        EnumVariants::new("AddressType", Self::ALL.iter().map(|t| t.as_str()))
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a basic address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAddress {
    /// Person or business name.
    pub name: String,
    /// Building number, digits only.
    pub street_number: String,
    /// Street name.
    pub street_name: String,
    /// City.
    pub city: String,
}

/// Typed view of a residential unit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentialUnit {
    /// Unit or apartment number.
    pub unit_number: String,
    /// Floor, if given.
    pub floor: Option<String>,
}

/// Typed view of a full address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Person or business name.
    pub name: String,
    /// Building number, digits only.
    pub street_number: String,
    /// Street name.
    pub street_name: String,
    /// City.
    pub city: String,
    /// Canadian postal code as written in the response.
    pub postal_code: String,
    /// Residential or commercial.
    pub address_type: AddressType,
    /// Unit number, if mentioned.
    pub unit_number: Option<String>,
    /// Building name, if mentioned.
    pub building_name: Option<String>,
    /// Unit details; residential addresses only.
    pub unit: Option<ResidentialUnit>,
}

fn address_base(name: &str) -> typedex_schema::SchemaBuilder {
    Schema::builder(name)
        .field(
            FieldDescriptor::required("name", FieldKind::String)
                .describe("business or person name"),
        )
        .field(
            FieldDescriptor::required("street_number", FieldKind::String)
                .describe("numbers only")
                .validate(NumericString),
        )
        .string("street_name", true)
        .string("city", true)
}

/// `Address` with `name`, `street_number` (digits), `street_name` and `city`.
pub fn basic_address_schema() -> Result<Schema, SchemaError> {
    address_base("Address")
        .description("A street address")
        .build()
}

/// `ResidentialUnit` with a required `unit_number` and optional `floor`.
pub fn residential_unit_schema() -> Result<Schema, SchemaError> {
    Schema::builder("ResidentialUnit")
        .description("An apartment or unit within a residential building")
        .string("unit_number", true)
        .string("floor", false)
        .build()
}

/// Full `Address` schema.
///
/// Adds to the basic schema a required Canadian `postal_code`, a required
/// `address_type`, optional `unit_number` and `building_name`, and an
/// optional nested `unit`.
pub fn address_schema() -> Result<Schema, SchemaError> {
    address_base("Address")
        .description("A Canadian street address")
        .field(
            FieldDescriptor::required("postal_code", FieldKind::String)
                .describe("Canadian format, A1A 1A1")
                .validate(CanadianPostalCode),
        )
        .enumeration("address_type", AddressType::variants(), true)
        .string("unit_number", false)
        .string("building_name", false)
        .record("unit", residential_unit_schema()?, false)
        .build()
}

/// A `unit` sub-record is only allowed on residential addresses.
#[must_use]
pub fn unit_requires_residential() -> PresentOnlyWhen {
    PresentOnlyWhen::new("unit", "address_type", AddressType::Residential.as_str())
}

/// Two addresses are duplicates when name and street address match after
/// whitespace and case normalization.
#[must_use]
pub fn address_duplicates() -> DuplicateCheck {
    DuplicateCheck::on(["name", "street_number", "street_name", "city"])
}

/// Extractor for basic addresses with duplicate detection.
pub fn basic_addresses_extractor() -> Result<Extractor, SchemaError> {
    let spec = ExtractionSpec::new(basic_address_schema()?, ADDRESSES_KEY)
        .with_collection_validator(address_duplicates());
    Ok(Extractor::new(spec))
}

/// Extractor for full addresses with the unit rule and duplicate detection.
pub fn addresses_extractor() -> Result<Extractor, SchemaError> {
    let spec = ExtractionSpec::new(address_schema()?, ADDRESSES_KEY)
        .with_record_validator(unit_requires_residential())
        .with_collection_validator(address_duplicates());
    Ok(Extractor::new(spec))
}
