//! Pseudo-operation aliases.
//!
//! Several generic instructions have conventional names when applied to
//! one particular address, e.g. `TC 6` is `EXTEND` and `CS A` is `COM`.

use crate::cpu::instruction::{Instruction, Mnemonic};

/// (base, address, alias) overrides.
pub const ALIASES: [(Mnemonic, u16, Mnemonic); 16] = [
    (Mnemonic::Tc, 0, Mnemonic::Xxalq),
    (Mnemonic::Tc, 1, Mnemonic::Xlq),
    (Mnemonic::Tc, 2, Mnemonic::Return),
    (Mnemonic::Tc, 3, Mnemonic::Relint),
    (Mnemonic::Tc, 4, Mnemonic::Inhint),
    (Mnemonic::Tc, 6, Mnemonic::Extend),
    (Mnemonic::Das, 1, Mnemonic::Ddoubl),
    (Mnemonic::Lxch, 7, Mnemonic::Zl),
    (Mnemonic::Cs, 0, Mnemonic::Com),
    (Mnemonic::Index, 0o17, Mnemonic::Resume),
    (Mnemonic::Dxch, 5, Mnemonic::Dtcf),
    (Mnemonic::Dxch, 6, Mnemonic::Dtcb),
    (Mnemonic::Ts, 0, Mnemonic::Ovsk),
    (Mnemonic::Ts, 5, Mnemonic::Tcaa),
    (Mnemonic::Qxch, 7, Mnemonic::Zq),
    (Mnemonic::Dcs, 1, Mnemonic::Dcom),
];

/// Look up the alias for a base instruction at an address, if any.
pub fn alias_for(base: Mnemonic, addr: u16) -> Option<Mnemonic> {
    ALIASES
        .iter()
        .find(|&&(b, a, _)| b == base && a == addr)
        .map(|&(_, _, alias)| alias)
}

/// Build the instruction for a base mnemonic, collapsing it to its alias
/// when the address matches.
pub fn resolve(base: Mnemonic, addr: u16) -> Instruction {
    Instruction::new(alias_for(base, addr).unwrap_or(base), addr)
}
