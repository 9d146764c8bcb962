//! WebAssembly bindings for the AGC disassembler.
//!
//! This module provides JavaScript-friendly wrappers around the decoder.

use wasm_bindgen::prelude::*;
use crate::asm::disasm::{self, disassemble_instruction, Format, Options};
use crate::asm::Image;
use crate::cpu::{Decoder, ModeState};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly streaming decoder.
///
/// Feed words one at a time; the EXTEND state carries between calls.
#[wasm_bindgen]
pub struct WasmDecoder {
    decoder: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    /// Create a decoder in basic mode.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            decoder: Decoder::default(),
        }
    }

    /// Decode the next word. Returns the rendered instruction.
    #[wasm_bindgen]
    pub fn step(&mut self, word: u32) -> Result<String, JsError> {
        let instr = self.decoder.step(word)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        Ok(instr.to_string())
    }

    /// Whether the next word decodes against the extended table.
    #[wasm_bindgen]
    pub fn extended(&self) -> bool {
        self.decoder.mode().extended
    }

    /// Return to basic mode.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.decoder = Decoder::default();
    }
}

impl Default for WasmDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Disassemble a raw image into a text listing.
#[wasm_bindgen]
pub fn wasm_disassemble(bytes: &[u8], json: bool) -> Result<String, JsError> {
    let image = Image::from_bytes(bytes)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    let options = Options {
        format: if json { Format::Json } else { Format::Text },
        ..Options::default()
    };
    disasm::disassemble(&image.words, options)
        .map_err(|e| JsError::new(&format!("{}", e)))
}

/// Disassemble a single word.
#[wasm_bindgen]
pub fn wasm_disassemble_word(word: u32, extended: bool) -> String {
    disassemble_instruction(word, ModeState { extended })
}
