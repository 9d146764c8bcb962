//! Core rope binary images.
//!
//! An image is a flat stream of 16-bit big-endian words with no header.
//! The first word sits at the start of fixed memory (address 04000) and
//! each following word at the next address.

use std::io::Read;
use std::path::Path;

use crate::cpu::memory::{MemoryError, MemoryMap};
use thiserror::Error;

/// A loaded binary image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Words in file order, parity bit included.
    pub words: Vec<u16>,
}

impl Image {
    /// Parse an image from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() % 2 != 0 {
            return Err(ImageError::OddLength(bytes.len()));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { words })
    }

    /// Read an image from any reader.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, ImageError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ImageError::IoError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Build a memory map with this image as fixed memory.
    pub fn memory_map(&self) -> Result<MemoryMap, MemoryError> {
        MemoryMap::new(&self.words)
    }
}

/// Load an image file from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image, ImageError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| ImageError::IoError(e.to_string()))?;
    let image = Image::read_from(std::io::BufReader::new(file))?;
    log::debug!("loaded {} words from {}", image.len(), path.as_ref().display());
    Ok(image)
}

/// Errors that can occur while loading an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("image length {0} is not a whole number of 16-bit words")]
    OddLength(usize),
}
