//! Decoded AGC instructions.
//!
//! The instruction set has a basic table and an extended table selected
//! by a preceding EXTEND. On top of the generic forms, a number of named
//! pseudo-operations are really a generic instruction applied to one
//! specific address; those carry no operand.

use std::fmt;

use crate::cpu::decode::ModeState;
use serde::{Deserialize, Serialize};

/// Instruction mnemonics.
///
/// Grouped as basic instructions, extended instructions, and
/// zero-operand aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mnemonic {
    // ==================== Basic ====================

    /// Transfer control
    Tc,
    /// Count, compare and skip
    Ccs,
    /// Transfer control to fixed
    Tcf,
    /// Double add to storage
    Das,
    /// Exchange L and K
    Lxch,
    /// Increment
    Incr,
    /// Add to storage
    Ads,
    /// Clear and add
    Ca,
    /// Clear and subtract
    Cs,
    /// Index next instruction
    Index,
    /// Double exchange
    Dxch,
    /// Transfer to storage
    Ts,
    /// Exchange A and K
    Xch,
    /// Add
    Ad,
    /// Mask A by K
    Mask,

    // ==================== Extended ====================

    /// Read channel
    Read,
    /// Write channel
    Write,
    /// Read and mask
    Rand,
    /// Write and mask
    Wand,
    /// Read and superimpose
    Ror,
    /// Write and superimpose
    Wor,
    /// Read and invert
    Rxor,
    /// Ed Smally's interrupt
    Edrupt,
    /// Divide
    Dv,
    /// Branch zero to fixed
    Bzf,
    /// Modular subtract
    Msu,
    /// Exchange Q and K
    Qxch,
    /// Augment
    Aug,
    /// Diminish
    Dim,
    /// Double clear and add
    Dca,
    /// Double clear and subtract
    Dcs,
    /// Subtract
    Su,
    /// Branch zero or minus to fixed
    Bzmf,
    /// Multiply
    Mp,

    // ==================== Aliases ====================

    /// TC A
    Xxalq,
    /// TC L
    Xlq,
    /// TC Q
    Return,
    /// TC 3
    Relint,
    /// TC 4
    Inhint,
    /// TC 6
    Extend,
    /// DAS A
    Ddoubl,
    /// LXCH 7
    Zl,
    /// CS A
    Com,
    /// INDEX BRUPT
    Resume,
    /// DXCH Z
    Dtcf,
    /// DXCH BBANK
    Dtcb,
    /// TS A
    Ovsk,
    /// TS Z
    Tcaa,
    /// QXCH 7
    Zq,
    /// DCS A
    Dcom,
}

impl Mnemonic {
    /// Every mnemonic, in declaration order.
    pub const ALL: [Mnemonic; 50] = [
        Mnemonic::Tc, Mnemonic::Ccs, Mnemonic::Tcf, Mnemonic::Das, Mnemonic::Lxch,
        Mnemonic::Incr, Mnemonic::Ads, Mnemonic::Ca, Mnemonic::Cs, Mnemonic::Index,
        Mnemonic::Dxch, Mnemonic::Ts, Mnemonic::Xch, Mnemonic::Ad, Mnemonic::Mask,
        Mnemonic::Read, Mnemonic::Write, Mnemonic::Rand, Mnemonic::Wand, Mnemonic::Ror,
        Mnemonic::Wor, Mnemonic::Rxor, Mnemonic::Edrupt, Mnemonic::Dv, Mnemonic::Bzf,
        Mnemonic::Msu, Mnemonic::Qxch, Mnemonic::Aug, Mnemonic::Dim, Mnemonic::Dca,
        Mnemonic::Dcs, Mnemonic::Su, Mnemonic::Bzmf, Mnemonic::Mp,
        Mnemonic::Xxalq, Mnemonic::Xlq, Mnemonic::Return, Mnemonic::Relint,
        Mnemonic::Inhint, Mnemonic::Extend, Mnemonic::Ddoubl, Mnemonic::Zl,
        Mnemonic::Com, Mnemonic::Resume, Mnemonic::Dtcf, Mnemonic::Dtcb,
        Mnemonic::Ovsk, Mnemonic::Tcaa, Mnemonic::Zq, Mnemonic::Dcom,
    ];

    /// Assembler name of the instruction.
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Tc => "TC",
            Mnemonic::Ccs => "CCS",
            Mnemonic::Tcf => "TCF",
            Mnemonic::Das => "DAS",
            Mnemonic::Lxch => "LXCH",
            Mnemonic::Incr => "INCR",
            Mnemonic::Ads => "ADS",
            Mnemonic::Ca => "CA",
            Mnemonic::Cs => "CS",
            Mnemonic::Index => "INDEX",
            Mnemonic::Dxch => "DXCH",
            Mnemonic::Ts => "TS",
            Mnemonic::Xch => "XCH",
            Mnemonic::Ad => "AD",
            Mnemonic::Mask => "MASK",
            Mnemonic::Read => "READ",
            Mnemonic::Write => "WRITE",
            Mnemonic::Rand => "RAND",
            Mnemonic::Wand => "WAND",
            Mnemonic::Ror => "ROR",
            Mnemonic::Wor => "WOR",
            Mnemonic::Rxor => "RXOR",
            Mnemonic::Edrupt => "EDRUPT",
            Mnemonic::Dv => "DV",
            Mnemonic::Bzf => "BZF",
            Mnemonic::Msu => "MSU",
            Mnemonic::Qxch => "QXCH",
            Mnemonic::Aug => "AUG",
            Mnemonic::Dim => "DIM",
            Mnemonic::Dca => "DCA",
            Mnemonic::Dcs => "DCS",
            Mnemonic::Su => "SU",
            Mnemonic::Bzmf => "BZMF",
            Mnemonic::Mp => "MP",
            Mnemonic::Xxalq => "XXALQ",
            Mnemonic::Xlq => "XLQ",
            Mnemonic::Return => "RETURN",
            Mnemonic::Relint => "RELINT",
            Mnemonic::Inhint => "INHINT",
            Mnemonic::Extend => "EXTEND",
            Mnemonic::Ddoubl => "DDOUBL",
            Mnemonic::Zl => "ZL",
            Mnemonic::Com => "COM",
            Mnemonic::Resume => "RESUME",
            Mnemonic::Dtcf => "DTCF",
            Mnemonic::Dtcb => "DTCB",
            Mnemonic::Ovsk => "OVSK",
            Mnemonic::Tcaa => "TCAA",
            Mnemonic::Zq => "ZQ",
            Mnemonic::Dcom => "DCOM",
        }
    }

    /// Whether the instruction carries an operand address.
    ///
    /// False exactly for the pseudo-operation aliases.
    pub const fn has_operand(self) -> bool {
        !matches!(
            self,
            Mnemonic::Xxalq
                | Mnemonic::Xlq
                | Mnemonic::Return
                | Mnemonic::Relint
                | Mnemonic::Inhint
                | Mnemonic::Extend
                | Mnemonic::Ddoubl
                | Mnemonic::Zl
                | Mnemonic::Com
                | Mnemonic::Resume
                | Mnemonic::Dtcf
                | Mnemonic::Dtcb
                | Mnemonic::Ovsk
                | Mnemonic::Tcaa
                | Mnemonic::Zq
                | Mnemonic::Dcom
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded instruction.
///
/// `operand` is `Some` exactly when the mnemonic has an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    mnemonic: Mnemonic,
    operand: Option<u16>,
}

impl Instruction {
    /// Build an instruction from a mnemonic and its (already narrowed)
    /// address. The address is dropped for zero-operand aliases.
    pub fn new(mnemonic: Mnemonic, addr: u16) -> Self {
        Self {
            mnemonic,
            operand: mnemonic.has_operand().then_some(addr),
        }
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    pub fn operand(&self) -> Option<u16> {
        self.operand
    }

    /// Mode the decoder is in after this instruction.
    pub fn next_mode(&self) -> ModeState {
        ModeState {
            extended: self.mnemonic == Mnemonic::Extend,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(addr) => write!(f, "{} {:04o}", self.mnemonic, addr),
            None => write!(f, "{}", self.mnemonic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_count() {
        let aliases = Mnemonic::ALL.iter().filter(|m| !m.has_operand()).count();
        assert_eq!(aliases, 16);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Mnemonic::ALL.iter().map(|m| m.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Mnemonic::ALL.len());
    }

    #[test]
    fn test_render_with_operand() {
        assert_eq!(Instruction::new(Mnemonic::Tc, 0o47).to_string(), "TC 0047");
        assert_eq!(Instruction::new(Mnemonic::Ca, 0o7777).to_string(), "CA 7777");
    }

    #[test]
    fn test_render_alias_drops_operand() {
        let instr = Instruction::new(Mnemonic::Extend, 6);
        assert_eq!(instr.operand(), None);
        assert_eq!(instr.to_string(), "EXTEND");
    }

    #[test]
    fn test_only_extend_sets_mode() {
        for m in Mnemonic::ALL {
            let instr = Instruction::new(m, 0);
            assert_eq!(instr.next_mode().extended, m == Mnemonic::Extend);
        }
    }

    #[test]
    fn test_serializes_uppercase() {
        let json = serde_json::to_string(&Instruction::new(Mnemonic::Bzmf, 0o10)).unwrap();
        assert_eq!(json, r#"{"mnemonic":"BZMF","operand":8}"#);
    }
}
