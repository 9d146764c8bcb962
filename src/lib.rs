//! # AGC Disassembler
//!
//! Decodes core rope images of the Apollo Guidance Computer (Block II)
//! into symbolic instructions.
//!
//! The decoder reproduces the instruction encoding: basic and extended
//! opcode tables, quarter-code sub-dispatch, address-width narrowing,
//! and the named pseudo-operations that are specific operands of a
//! generic instruction.

pub mod word;
pub mod cpu;
pub mod asm;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use word::{extract_fields, AddressWidth, DecodedFields};
pub use cpu::{decode, decode_stream, DecodeError, DecodedWord, Decoder, Instruction, MemoryError, MemoryMap, Mnemonic, ModeState};
pub use asm::{disassemble, load_image, Image, ImageError};
