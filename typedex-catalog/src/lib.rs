//! # typedex-catalog
//!
//! Ready-made schemas and extractors for typedex.
//!
//! - **[`address`]**: basic and full Canadian addresses, residential units,
//!   the unit rule and address duplicate detection
//! - **[`groceries`]**: grocery list items
//!
//! ## Example
//!
//! ```rust
//! use typedex_catalog::{addresses_extractor, Address, AddressType};
//!
//! let raw = r#"{"addresses": [{
//!     "name": "Library", "street_number": "150", "street_name": "Elgin St",
//!     "city": "Ottawa", "postal_code": "K2P 1L4", "address_type": "commercial"
//! }]}"#;
//!
//! let addresses: Vec<Address> = addresses_extractor()
//!     .unwrap()
//!     .extract(raw)
//!     .unwrap()
//!     .deserialize_into()
//!     .unwrap();
//! assert_eq!(addresses[0].address_type, AddressType::Commercial);
//! assert!(addresses[0].address_type.requires_business_license());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod address;
pub mod groceries;

pub use address::{
    address_duplicates, address_schema, addresses_extractor, basic_address_schema,
    basic_addresses_extractor, residential_unit_schema, unit_requires_residential, Address,
    AddressType, BasicAddress, ResidentialUnit, ADDRESSES_KEY,
};
pub use groceries::{groceries_extractor, item_schema, Item, GROCERIES_KEY};
