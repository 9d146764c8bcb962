//! AGC memory map.
//!
//! The address space is flat erasable memory followed by fixed (rope)
//! memory:
//!
//! ```text
//! ERASABLE  unswitched (E0-E2)        000000 - 001377
//!           switched (E3-E7)          001400 - 003777
//! FIXED     unswitched (F2, F3)       004000 - 007777
//!           switched (F0, F1, F4-F43) 010000 - 113777
//! ```
//!
//! Fixed banks 02 and 03 are only present at 004000 - 007777, so bank 04
//! starts at 014000. The lowest addresses are memory-mapped registers
//! and I/O, some of which transform the stored value on read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of erasable cells.
pub const ERASABLE_SIZE: usize = 0o4000;

/// Number of fixed cells.
pub const FIXED_SIZE: usize = 0o110000;

/// Total number of cells.
pub const MEMORY_SIZE: usize = ERASABLE_SIZE + FIXED_SIZE;

/// Highest register-mapped address.
pub const LAST_REGISTER: usize = 0o23;

// Register addresses with read rules
const REG_A: usize = 0;
const REG_Q: usize = 2;
const REG_EBANK: usize = 3;
const REG_FBANK: usize = 4;
const REG_BBANK: usize = 6;
const REG_ZERO: usize = 7;

/// 15-bit register mask.
const REG_MASK: u32 = 0o77777;

/// Which region an address falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Erasable,
    Fixed,
}

/// AGC memory: erasable cells followed by fixed cells.
///
/// Serializes as a flat array of every cell; deserializing checks the
/// length.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct MemoryMap {
    cells: Vec<u32>,
}

impl MemoryMap {
    /// Create a memory map whose fixed region starts with `fixed` and is
    /// zero-padded to capacity. Erasable memory starts zeroed.
    pub fn new(fixed: &[u16]) -> Result<Self, MemoryError> {
        if fixed.len() > FIXED_SIZE {
            return Err(MemoryError::CapacityExceeded {
                size: fixed.len(),
                capacity: FIXED_SIZE,
            });
        }

        let mut cells = vec![0; MEMORY_SIZE];
        for (cell, &word) in cells[ERASABLE_SIZE..].iter_mut().zip(fixed) {
            *cell = u32::from(word);
        }
        Ok(Self { cells })
    }

    /// Number of addressable cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Classify an address.
    pub fn region(&self, addr: usize) -> Result<Region, MemoryError> {
        self.check(addr)?;
        Ok(if addr < ERASABLE_SIZE {
            Region::Erasable
        } else {
            Region::Fixed
        })
    }

    /// Read a cell, applying register rules in the mapped range.
    pub fn read(&self, addr: usize) -> Result<u32, MemoryError> {
        self.check(addr)?;
        if addr <= LAST_REGISTER {
            Ok(self.read_register(addr))
        } else {
            Ok(self.cells[addr])
        }
    }

    /// Store a raw value, bypassing register rules.
    pub fn write(&mut self, addr: usize, value: u32) -> Result<(), MemoryError> {
        self.check(addr)?;
        self.cells[addr] = value;
        Ok(())
    }

    fn read_register(&self, addr: usize) -> u32 {
        match addr {
            REG_A | REG_Q => self.cells[addr] & REG_MASK,
            // Both banks
            REG_BBANK => self.cells[REG_FBANK].wrapping_add(self.cells[REG_EBANK] >> 8),
            REG_ZERO => 0,
            _ => self.cells[addr],
        }
    }

    fn check(&self, addr: usize) -> Result<(), MemoryError> {
        if addr >= self.cells.len() {
            return Err(MemoryError::AddressOutOfRange(addr));
        }
        Ok(())
    }
}

impl TryFrom<Vec<u32>> for MemoryMap {
    type Error = MemoryError;

    fn try_from(cells: Vec<u32>) -> Result<Self, Self::Error> {
        if cells.len() != MEMORY_SIZE {
            return Err(MemoryError::SizeMismatch {
                size: cells.len(),
                expected: MEMORY_SIZE,
            });
        }
        Ok(Self { cells })
    }
}

impl From<MemoryMap> for Vec<u32> {
    fn from(mem: MemoryMap) -> Self {
        mem.cells
    }
}

impl std::fmt::Debug for MemoryMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|&&cell| cell != 0).count();

        f.debug_struct("MemoryMap")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &self.cells.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("fixed image too long ({size:o} words, max {capacity:o})")]
    CapacityExceeded { size: usize, capacity: usize },

    #[error("memory image has {size:o} cells, expected {expected:o}")]
    SizeMismatch { size: usize, expected: usize },

    #[error("memory address {0:o} out of range")]
    AddressOutOfRange(usize),
}
