//! 16-bit word primitives for the AGC.
//!
//! This module provides the two leaf stages of instruction decoding:
//! - [`DecodedFields`] - the fixed bit fields of a memory word
//! - [`AddressWidth`] - narrowing of the 12-bit address field

mod fields;
mod width;

pub use fields::{extract_fields, DecodedFields, WORD_MASK};
pub use width::AddressWidth;
