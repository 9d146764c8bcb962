//! Image loading and disassembly listings.
//!
//! This module provides:
//! - A loader for flat big-endian core rope images
//! - A disassembler (image → readable listing)

pub mod disasm;
pub mod image;

pub use disasm::{disassemble, dump, Format, ListingError, Options};
pub use image::{load_image, Image, ImageError};
