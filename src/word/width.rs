//! Address field narrowing.
//!
//! The raw address field is 12 bits wide, but several instruction
//! families only ever reach erasable memory (10 bits) or the I/O
//! channel space (9 bits). In those families the upper address bits
//! are the quarter-code or peripheral code and must be masked off.

use serde::{Deserialize, Serialize};

/// Width of an instruction's operand address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressWidth {
    /// I/O channel address (peripheral-coded instructions).
    Channel9,
    /// Erasable memory address (quarter-coded instructions).
    Erasable10,
    /// Full address field.
    Full12,
}

impl AddressWidth {
    /// Mask selecting the significant bits.
    pub const fn mask(self) -> u16 {
        match self {
            AddressWidth::Channel9 => 0o777,
            AddressWidth::Erasable10 => 0o1777,
            AddressWidth::Full12 => 0o7777,
        }
    }

    /// Narrow an address field to this width.
    #[inline]
    pub const fn narrow(self, addr: u16) -> u16 {
        addr & self.mask()
    }
}
