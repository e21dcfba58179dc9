//! Standard library utilities.
//!
//! Numeric conversion between integers/decimals and their text form.

pub mod conversion;

pub use conversion::{
    Base, FixedText, NumText, fixed_point_to_text, integer_to_text, parse_signed,
    parse_unsigned, unsigned_to_text, unsigned_to_text_u64,
};
