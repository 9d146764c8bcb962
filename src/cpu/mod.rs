//! AGC instruction decoding and memory model.
//!
//! This module implements the Block II instruction encoding:
//! - basic and extended opcode tables with quarter-code sub-dispatch
//! - pseudo-operation aliases of generic instructions
//! - the erasable/fixed memory map with memory-mapped registers

pub mod decode;
pub mod instruction;
pub mod memory;
pub mod special;

pub use decode::{decode, decode_stream, DecodeError, DecodeStream, DecodedWord, Decoder, ModeState};
pub use instruction::{Instruction, Mnemonic};
pub use memory::{MemoryError, MemoryMap, Region};
