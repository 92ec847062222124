//! Attribute-value unmarshalling
//!
//! Converts the type-tagged wire encoding of the change stream into plain
//! nested values. Parsing into [`AttributeValue`] validates the shape of a
//! wire value; decoding turns it into a [`DecodedValue`] and validates the
//! numeric literals.

pub mod attribute;
pub mod decoder;
pub mod number;
pub mod value;

pub use attribute::{AttributeValue, Tag};
pub use decoder::{decode, decode_image, decode_optional_image, decode_raw_image, decode_value};
pub use number::parse_number;
pub use value::{map_into_json, DecodedMap, DecodedValue};
