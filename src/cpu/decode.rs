//! Instruction decoder for the AGC.
//!
//! A word is decoded against one of two tables: the basic table, or the
//! extended table that applies to the single word following an EXTEND.
//! Both tables are keyed by the 3-bit opcode; some opcodes are further
//! split by the quarter-code or, for the I/O family, the peripheral code.

use crate::cpu::instruction::{Instruction, Mnemonic};
use crate::cpu::special::resolve;
use crate::word::{extract_fields, AddressWidth, DecodedFields};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address of the first word of a core rope image.
pub const FIXED_ORIGIN: u32 = 0o4000;

/// Which opcode table the next word is decoded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeState {
    pub extended: bool,
}

impl ModeState {
    pub const BASIC: ModeState = ModeState { extended: false };
    pub const EXTENDED: ModeState = ModeState { extended: true };
}

/// Decode a single word in the given mode.
pub fn decode(word: u32, mode: ModeState) -> Result<Instruction, DecodeError> {
    let fields = extract_fields(word)?;
    if mode.extended {
        decode_extended(&fields)
    } else {
        decode_basic(&fields)
    }
}

/// Basic (non-extended) opcode table.
fn decode_basic(f: &DecodedFields) -> Result<Instruction, DecodeError> {
    let full = AddressWidth::Full12.narrow(f.address);
    let erasable = AddressWidth::Erasable10.narrow(f.address);

    let instruction = match f.opcode {
        0 => resolve(Mnemonic::Tc, full),
        1 if f.quarter_code == 0 => Instruction::new(Mnemonic::Ccs, erasable),
        1 => Instruction::new(Mnemonic::Tcf, full),
        2 => match f.quarter_code {
            0 => resolve(Mnemonic::Das, erasable),
            1 => resolve(Mnemonic::Lxch, erasable),
            2 => Instruction::new(Mnemonic::Incr, erasable),
            _ => Instruction::new(Mnemonic::Ads, erasable),
        },
        3 => Instruction::new(Mnemonic::Ca, full),
        4 => resolve(Mnemonic::Cs, full),
        5 => match f.quarter_code {
            0 => resolve(Mnemonic::Index, erasable),
            1 => resolve(Mnemonic::Dxch, erasable),
            2 => resolve(Mnemonic::Ts, erasable),
            _ => Instruction::new(Mnemonic::Xch, erasable),
        },
        6 => Instruction::new(Mnemonic::Ad, full),
        7 => Instruction::new(Mnemonic::Mask, full),
        op => return Err(DecodeError::InvalidOpcode(op)),
    };

    Ok(instruction)
}

/// Extended opcode table, in effect for the word after an EXTEND.
fn decode_extended(f: &DecodedFields) -> Result<Instruction, DecodeError> {
    let full = AddressWidth::Full12.narrow(f.address);
    let erasable = AddressWidth::Erasable10.narrow(f.address);

    let instruction = match f.opcode {
        0 => {
            let channel = AddressWidth::Channel9.narrow(f.address);
            let mnemonic = match f.p_code {
                0 => Mnemonic::Read,
                1 => Mnemonic::Write,
                2 => Mnemonic::Rand,
                3 => Mnemonic::Wand,
                4 => Mnemonic::Ror,
                5 => Mnemonic::Wor,
                6 => Mnemonic::Rxor,
                _ => Mnemonic::Edrupt,
            };
            Instruction::new(mnemonic, channel)
        }
        1 if f.quarter_code == 0 => Instruction::new(Mnemonic::Dv, erasable),
        1 => Instruction::new(Mnemonic::Bzf, full),
        2 => match f.quarter_code {
            0 => Instruction::new(Mnemonic::Msu, erasable),
            1 => resolve(Mnemonic::Qxch, erasable),
            2 => Instruction::new(Mnemonic::Aug, erasable),
            _ => Instruction::new(Mnemonic::Dim, erasable),
        },
        3 => Instruction::new(Mnemonic::Dca, full),
        4 => resolve(Mnemonic::Dcs, full),
        // Extended INDEX takes the full field and has no RESUME form.
        5 => Instruction::new(Mnemonic::Index, full),
        6 if f.quarter_code == 0 => Instruction::new(Mnemonic::Su, erasable),
        6 => Instruction::new(Mnemonic::Bzmf, full),
        7 => Instruction::new(Mnemonic::Mp, full),
        op => return Err(DecodeError::InvalidOpcode(op)),
    };

    Ok(instruction)
}

/// One line of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedWord {
    /// Memory address of the word.
    pub address: u32,
    /// The word with its parity bit discarded.
    pub value: u32,
    pub instruction: Instruction,
}

/// Sequential decoder carrying the mode from one word to the next.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    mode: ModeState,
}

impl Decoder {
    /// Create a decoder starting in the given mode.
    pub fn new(mode: ModeState) -> Self {
        Self { mode }
    }

    /// Mode the next word will be decoded in.
    pub fn mode(&self) -> ModeState {
        self.mode
    }

    /// Decode the next word and advance the mode.
    ///
    /// On error the mode is reset, as if the failed word were an
    /// ordinary instruction.
    pub fn step(&mut self, word: u32) -> Result<Instruction, DecodeError> {
        let result = decode(word, self.mode);
        let next = match &result {
            Ok(instr) => instr.next_mode(),
            Err(_) => ModeState::BASIC,
        };
        if next != self.mode {
            debug!("decoder mode: extended={} -> {}", self.mode.extended, next.extended);
        }
        self.mode = next;
        result
    }
}

/// Iterator over a decoded word stream.
///
/// Created by [`decode_stream`].
#[derive(Debug, Clone)]
pub struct DecodeStream<I> {
    words: I,
    decoder: Decoder,
    address: u32,
}

impl<I, W> Iterator for DecodeStream<I>
where
    I: Iterator<Item = W>,
    W: Into<u32>,
{
    type Item = Result<DecodedWord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let word: u32 = self.words.next()?.into();
        let address = self.address;
        self.address += 1;

        let result = self.decoder.step(word).map(|instruction| DecodedWord {
            address,
            value: word >> 1,
            instruction,
        });
        if let Ok(line) = &result {
            trace!("{:05o}: {:06o} {}", address, word, line.instruction);
        }
        Some(result)
    }
}

/// Decode a word stream laid out from the start of fixed memory.
pub fn decode_stream<I, W>(words: I, initial_mode: ModeState) -> DecodeStream<I::IntoIter>
where
    I: IntoIterator<Item = W>,
    W: Into<u32>,
{
    DecodeStream {
        words: words.into_iter(),
        decoder: Decoder::new(initial_mode),
        address: FIXED_ORIGIN,
    }
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("word {0:#o} has bits set above bit 15")]
    OutOfRange(u32),

    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Assemble a word from opcode and 12-bit address, parity clear.
    fn word(opcode: u32, addr: u32) -> u32 {
        (opcode << 13) | (addr << 1)
    }

    fn basic(w: u32) -> Instruction {
        decode(w, ModeState::BASIC).unwrap()
    }

    fn extended(w: u32) -> Instruction {
        decode(w, ModeState::EXTENDED).unwrap()
    }

    #[test]
    fn test_decode_extend() {
        let instr = basic(0o000006 << 1);
        assert_eq!(instr.mnemonic(), Mnemonic::Extend);
        assert_eq!(instr.operand(), None);
        assert_eq!(instr.to_string(), "EXTEND");
        assert!(instr.next_mode().extended);
    }

    #[test]
    fn test_extend_then_read() {
        let mut decoder = Decoder::default();
        assert_eq!(decoder.step(word(0, 6)).unwrap().mnemonic(), Mnemonic::Extend);
        assert!(decoder.mode().extended);

        let instr = decoder.step(word(0, 0o0077)).unwrap();
        assert_eq!(instr.mnemonic(), Mnemonic::Read);
        assert_eq!(instr.operand(), Some(0o77));
        assert!(!decoder.mode().extended);

        // Same word again is a plain TC
        let instr = decoder.step(word(0, 0o0077)).unwrap();
        assert_eq!(instr.mnemonic(), Mnemonic::Tc);
    }

    #[test]
    fn test_tc_family() {
        assert_eq!(basic(word(0, 5)).to_string(), "TC 0005");
        assert_eq!(basic(word(0, 0o4321)).to_string(), "TC 4321");
        assert_eq!(basic(word(0, 2)).mnemonic(), Mnemonic::Return);
    }

    #[test]
    fn test_ccs_and_tcf() {
        assert_eq!(basic(word(1, 0o0123)).to_string(), "CCS 0123");
        assert_eq!(basic(word(1, 0o2123)).to_string(), "TCF 2123");
        assert_eq!(basic(word(1, 0o6000)).to_string(), "TCF 6000");
    }

    #[test]
    fn test_quarter_coded_opcode_2() {
        assert_eq!(basic(word(2, 0o0001)).mnemonic(), Mnemonic::Ddoubl);
        assert_eq!(basic(word(2, 0o0100)).to_string(), "DAS 0100");
        assert_eq!(basic(word(2, 0o2007)).mnemonic(), Mnemonic::Zl);
        assert_eq!(basic(word(2, 0o2006)).to_string(), "LXCH 0006");
        assert_eq!(basic(word(2, 0o4055)).to_string(), "INCR 0055");
        assert_eq!(basic(word(2, 0o7777)).to_string(), "ADS 1777");
    }

    #[test]
    fn test_cs_com() {
        assert_eq!(basic(word(4, 0)).to_string(), "COM");
        assert_eq!(basic(word(4, 1)).to_string(), "CS 0001");
        assert_eq!(basic(word(4, 0o4000)).to_string(), "CS 4000");
    }

    #[test]
    fn test_quarter_coded_opcode_5() {
        assert_eq!(basic(word(5, 0o0017)).mnemonic(), Mnemonic::Resume);
        assert_eq!(basic(word(5, 0o0020)).to_string(), "INDEX 0020");
        assert_eq!(basic(word(5, 0o2005)).mnemonic(), Mnemonic::Dtcf);
        assert_eq!(basic(word(5, 0o2006)).mnemonic(), Mnemonic::Dtcb);
        assert_eq!(basic(word(5, 0o2001)).to_string(), "DXCH 0001");
        assert_eq!(basic(word(5, 0o4000)).mnemonic(), Mnemonic::Ovsk);
        assert_eq!(basic(word(5, 0o4005)).mnemonic(), Mnemonic::Tcaa);
        assert_eq!(basic(word(5, 0o4100)).to_string(), "TS 0100");
        assert_eq!(basic(word(5, 0o6000)).to_string(), "XCH 0000");
    }

    #[test]
    fn test_full_width_basic() {
        assert_eq!(basic(word(3, 0o7001)).to_string(), "CA 7001");
        assert_eq!(basic(word(6, 0o3000)).to_string(), "AD 3000");
        assert_eq!(basic(word(7, 0o0007)).to_string(), "MASK 0007");
    }

    #[test]
    fn test_io_channel_family() {
        let expected = [
            Mnemonic::Read,
            Mnemonic::Write,
            Mnemonic::Rand,
            Mnemonic::Wand,
            Mnemonic::Ror,
            Mnemonic::Wor,
            Mnemonic::Rxor,
            Mnemonic::Edrupt,
        ];
        for (p_code, mnemonic) in expected.into_iter().enumerate() {
            let instr = extended(word(0, ((p_code as u32) << 9) | 0o777));
            assert_eq!(instr.mnemonic(), mnemonic);
            assert_eq!(instr.operand(), Some(0o777));
        }
    }

    #[test]
    fn test_extended_quarter_codes() {
        assert_eq!(extended(word(1, 0o1234)).to_string(), "DV 1234");
        assert_eq!(extended(word(1, 0o4321)).to_string(), "BZF 4321");
        assert_eq!(extended(word(2, 0o0044)).to_string(), "MSU 0044");
        assert_eq!(extended(word(2, 0o2007)).to_string(), "ZQ");
        assert_eq!(extended(word(2, 0o2010)).to_string(), "QXCH 0010");
        assert_eq!(extended(word(2, 0o4044)).to_string(), "AUG 0044");
        assert_eq!(extended(word(2, 0o6044)).to_string(), "DIM 0044");
        assert_eq!(extended(word(6, 0o0100)).to_string(), "SU 0100");
        assert_eq!(extended(word(6, 0o2100)).to_string(), "BZMF 2100");
    }

    #[test]
    fn test_extended_full_width() {
        assert_eq!(extended(word(3, 0o6001)).to_string(), "DCA 6001");
        assert_eq!(extended(word(4, 1)).to_string(), "DCOM");
        assert_eq!(extended(word(4, 0)).to_string(), "DCS 0000");
        assert_eq!(extended(word(5, 0o6017)).to_string(), "INDEX 6017");
        assert_eq!(extended(word(5, 0o0017)).to_string(), "INDEX 0017");
        assert_eq!(extended(word(7, 0o7777)).to_string(), "MP 7777");
    }

    #[test]
    fn test_parity_bit_is_ignored() {
        assert_eq!(basic(word(3, 0o123) | 1), basic(word(3, 0o123)));
    }

    #[test]
    fn test_out_of_range_word() {
        assert_eq!(
            decode(0x1_0000, ModeState::BASIC),
            Err(DecodeError::OutOfRange(0x1_0000))
        );
    }

    #[test]
    fn test_stream_addresses_and_values() {
        let words: Vec<u16> = vec![0o000006 << 1, 0o000077 << 1, 0o030001 << 1 | 1];
        let lines: Vec<_> = decode_stream(words, ModeState::BASIC)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(lines[0].address, 0o4000);
        assert_eq!(lines[0].instruction.to_string(), "EXTEND");
        assert_eq!(lines[1].address, 0o4001);
        assert_eq!(lines[1].value, 0o77);
        assert_eq!(lines[1].instruction.to_string(), "READ 0077");
        assert_eq!(lines[2].address, 0o4002);
        assert_eq!(lines[2].value, 0o30001);
        assert_eq!(lines[2].instruction.to_string(), "CA 0001");
    }

    #[test]
    fn test_stream_initial_extended_mode() {
        let mut lines = decode_stream([0u16], ModeState::EXTENDED);
        let line = lines.next().unwrap().unwrap();
        assert_eq!(line.instruction.mnemonic(), Mnemonic::Read);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_stream_reports_bad_word_and_continues() {
        let words = [0o000006u32 << 1, 0x2_0000, 0];
        let results: Vec<_> = decode_stream(words, ModeState::BASIC).collect();
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(DecodeError::OutOfRange(0x2_0000)));
        // The failed word consumed the EXTEND
        assert_eq!(
            results[2].as_ref().unwrap().instruction.mnemonic(),
            Mnemonic::Xxalq
        );
    }

    proptest! {
        #[test]
        fn prop_every_word_decodes(w in any::<u16>(), ext in any::<bool>()) {
            let instr = decode(u32::from(w), ModeState { extended: ext }).unwrap();
            prop_assert_eq!(instr.operand().is_some(), instr.mnemonic().has_operand());
            if let Some(addr) = instr.operand() {
                prop_assert!(addr <= 0o7777);
            }
        }

        #[test]
        fn prop_cs_alias_only_at_zero(addr in 0u32..=0o7777) {
            let instr = decode(word(4, addr), ModeState::BASIC).unwrap();
            if addr == 0 {
                prop_assert_eq!(instr.mnemonic(), Mnemonic::Com);
            } else {
                prop_assert_eq!(instr.mnemonic(), Mnemonic::Cs);
                prop_assert_eq!(instr.operand(), Some(addr as u16));
            }
        }

        #[test]
        fn prop_io_channel_fits_nine_bits(addr in 0u32..=0o7777) {
            let instr = decode(word(0, addr), ModeState::EXTENDED).unwrap();
            prop_assert_eq!(instr.operand(), Some((addr & 0o777) as u16));
        }
    }
}
