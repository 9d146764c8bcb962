//! Disassembler for AGC core rope images.
//!
//! Produces one line per word: octal address, octal word value with the
//! parity bit stripped, and the decoded instruction, tab-separated.

use crate::cpu::decode::{decode, decode_stream, DecodeError, DecodedWord, ModeState, FIXED_ORIGIN};
use thiserror::Error;

/// Output format of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `address\tvalue\tinstruction`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Listing settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub format: Format,
    /// Mode for the first word.
    pub initial_mode: ModeState,
}

/// Disassemble a single word to text.
pub fn disassemble_instruction(word: u32, mode: ModeState) -> String {
    match decode(word, mode) {
        Ok(instr) => instr.to_string(),
        Err(_) => format!("??? ; {:o}", word),
    }
}

/// Format one decoded word as a listing line.
pub fn format_line(line: &DecodedWord, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(format!("{:05o}\t{:05o}\t{}", line.address, line.value, line.instruction)),
        Format::Json => serde_json::to_string(line),
    }
}

/// Disassemble an image's words into a listing.
pub fn disassemble(words: &[u16], options: Options) -> Result<String, ListingError> {
    let mut output = String::new();

    for result in decode_stream(words.iter().copied(), options.initial_mode) {
        let line = result?;
        output.push_str(&format_line(&line, options.format)?);
        output.push('\n');
    }

    Ok(output)
}

/// List addresses and parity-stripped values without decoding.
pub fn dump(words: &[u16]) -> String {
    let mut output = String::new();
    for (address, word) in (FIXED_ORIGIN..).zip(words) {
        output.push_str(&format!("{:05o}\t{:05o}\n", address, word >> 1));
    }
    output
}

/// Errors that can occur while producing a listing.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
