//! Bit field extraction.
//!
//! A core rope word is 16 bits: 15 data bits followed by a parity bit.
//!
//! ```text
//!  1 1 1 1 1 1
//!  5 4 3 2 1 0 9 8 7 6 5 4 3 2 1 0
//!  c c c                              opcode
//!        q q                          quarter-code
//!        p p p                        peripheral code
//!        a a a a a a a a a a a a      address (includes q and p bits)
//!                                p    parity
//! ```

use crate::cpu::DecodeError;
use serde::{Deserialize, Serialize};

/// Bits a word may occupy.
pub const WORD_MASK: u32 = 0xFFFF;

/// The fixed fields of a memory word.
///
/// The quarter-code and peripheral code overlap the high bits of the
/// address field; which of them is meaningful depends on the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedFields {
    /// Bit 0.
    pub parity_bit: u8,
    /// Bits 12-1, the full 12-bit address.
    pub address: u16,
    /// Bits 12-10, used only by the extended I/O family.
    pub p_code: u8,
    /// Bits 12-11.
    pub quarter_code: u8,
    /// Bits 15-13.
    pub opcode: u8,
}

impl DecodedFields {
    /// Recombine the fields into the word they were extracted from.
    pub fn to_word(&self) -> u16 {
        (u16::from(self.opcode) << 13) | (self.address << 1) | u16::from(self.parity_bit)
    }

    /// The word with its parity bit discarded.
    pub fn value(&self) -> u16 {
        self.to_word() >> 1
    }
}

/// Split a word into its fields.
///
/// Fails with [`DecodeError::OutOfRange`] if any bit above bit 15 is set.
pub fn extract_fields(word: u32) -> Result<DecodedFields, DecodeError> {
    if word & WORD_MASK != word {
        return Err(DecodeError::OutOfRange(word));
    }

    let parity_bit = (word & 0b1) as u8;
    let data = word >> 1;
    Ok(DecodedFields {
        parity_bit,
        address: (data & 0o7777) as u16,
        p_code: ((data >> 9) & 0b111) as u8,
        quarter_code: ((data >> 10) & 0b11) as u8,
        opcode: ((data >> 12) & 0b111) as u8,
    })
}
