//! Wire-form rendering for CI Load declarations.
//!
//! - **scalar**: date, money, quantity and decimal rendering plus ASCII
//!   sanitization
//! - **fields**: the field-length table and string rendering under it

pub mod fields;
pub mod scalar;

pub use fields::{FieldKind, FieldSpec, field_spec, field_specs, wire_string};
pub use scalar::{sanitize_ascii, wire_date, wire_decimal, wire_money, wire_quantity};
