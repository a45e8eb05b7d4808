//! Instruction decoder for the Hack CPU.
//!
//! Every 16-bit word is a valid instruction. Bit 15 selects the variant:
//!
//! ```text
//! address:  0 vvv vvvv vvvv vvvv      v = 15-bit literal
//! compute:  1 1 1 a cccccc ddd jjj     a = y source, c = ALU flags,
//!                                      d = A/D/M destinations, j = LT/EQ/GT
//! ```
//!
//! Bits 14 and 13 of a compute instruction are unused and ignored.

use crate::cpu::alu::AluFlags;
use crate::word::Word16;
use serde::{Serialize, Deserialize};

/// Where the ALU's y operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YSource {
    /// Register A (a-bit clear).
    #[default]
    Register,
    /// The memory word addressed by A (a-bit set).
    Memory,
}

/// Where register A's next value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSource {
    /// The literal field of an address instruction.
    Literal,
    /// The ALU output of a compute instruction.
    Computed,
}

/// Destination bits (instruction bits 5..3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    /// Build from the 3-bit field (A is bit 2).
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            a: bits & 0b100 != 0,
            d: bits & 0b010 != 0,
            m: bits & 0b001 != 0,
        }
    }

    pub const fn to_bits(self) -> u16 {
        (self.a as u16) << 2 | (self.d as u16) << 1 | (self.m as u16)
    }

    pub const fn is_empty(self) -> bool {
        !(self.a || self.d || self.m)
    }
}

/// Jump condition bits (instruction bits 2..0).
///
/// The bits combine: LT+EQ is "jump if <= 0", all three is unconditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Jump {
    pub lt: bool,
    pub eq: bool,
    pub gt: bool,
}

impl Jump {
    /// Build from the 3-bit field (LT is bit 2).
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            lt: bits & 0b100 != 0,
            eq: bits & 0b010 != 0,
            gt: bits & 0b001 != 0,
        }
    }

    pub const fn to_bits(self) -> u16 {
        (self.lt as u16) << 2 | (self.eq as u16) << 1 | (self.gt as u16)
    }

    /// Evaluate the condition against the ALU status outputs.
    pub const fn is_taken(self, zr: bool, ng: bool) -> bool {
        (self.lt && ng) || (self.eq && zr) || (self.gt && !ng && !zr)
    }
}

/// The fields of a compute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Compute {
    pub y_source: YSource,
    pub alu: AluFlags,
    pub dest: Dest,
    pub jump: Jump,
}

/// A decoded Hack instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// `@value`: load a 15-bit literal into A.
    Address(u16),
    /// `dest=comp;jump`
    Compute(Compute),
}

/// Flat control signals driven by one instruction.
///
/// For an address instruction every ALU, destination and jump signal is
/// clear; A still loads, from the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignals {
    pub zx: bool,
    pub nx: bool,
    pub zy: bool,
    pub ny: bool,
    pub f: bool,
    pub no: bool,
    pub dest_a: bool,
    pub dest_d: bool,
    pub dest_m: bool,
    pub jump_lt: bool,
    pub jump_eq: bool,
    pub jump_gt: bool,
    pub y_source: YSource,
    pub address_source: AddressSource,
}

impl ControlSignals {
    /// The ALU flags as a group.
    pub const fn alu_flags(&self) -> AluFlags {
        AluFlags {
            zx: self.zx,
            nx: self.nx,
            zy: self.zy,
            ny: self.ny,
            f: self.f,
            no: self.no,
        }
    }

    /// The jump condition as a group.
    pub const fn jump(&self) -> Jump {
        Jump { lt: self.jump_lt, eq: self.jump_eq, gt: self.jump_gt }
    }

    /// Whether register A loads at the end of this cycle.
    pub const fn loads_a(&self) -> bool {
        matches!(self.address_source, AddressSource::Literal) || self.dest_a
    }
}

/// Highest literal an address instruction can carry.
pub const MAX_LITERAL: u16 = 0x7FFF;

impl Instruction {
    /// Check for an address instruction.
    pub const fn is_address(&self) -> bool {
        matches!(self, Instruction::Address(_))
    }

    /// Flatten into control signals.
    pub fn signals(&self) -> ControlSignals {
        match *self {
            Instruction::Address(_) => ControlSignals {
                zx: false,
                nx: false,
                zy: false,
                ny: false,
                f: false,
                no: false,
                dest_a: false,
                dest_d: false,
                dest_m: false,
                jump_lt: false,
                jump_eq: false,
                jump_gt: false,
                y_source: YSource::Register,
                address_source: AddressSource::Literal,
            },
            Instruction::Compute(c) => ControlSignals {
                zx: c.alu.zx,
                nx: c.alu.nx,
                zy: c.alu.zy,
                ny: c.alu.ny,
                f: c.alu.f,
                no: c.alu.no,
                dest_a: c.dest.a,
                dest_d: c.dest.d,
                dest_m: c.dest.m,
                jump_lt: c.jump.lt,
                jump_eq: c.jump.eq,
                jump_gt: c.jump.gt,
                y_source: c.y_source,
                address_source: AddressSource::Computed,
            },
        }
    }
}

/// Decode a 16-bit instruction word.
pub fn decode(word: Word16) -> Instruction {
    if !word.bit(15) {
        return Instruction::Address(word.slice(14, 0));
    }

    Instruction::Compute(Compute {
        y_source: if word.bit(12) { YSource::Memory } else { YSource::Register },
        alu: AluFlags::from_bits(word.slice(11, 6)),
        dest: Dest::from_bits(word.slice(5, 3)),
        jump: Jump::from_bits(word.slice(2, 0)),
    })
}

/// Encode an instruction back to a word.
///
/// Compute instructions are emitted with bits 14..13 set, as the assembler
/// does. Address literals are truncated to 15 bits.
pub fn encode(instr: &Instruction) -> Word16 {
    match *instr {
        Instruction::Address(value) => Word16::new(value & MAX_LITERAL),
        Instruction::Compute(c) => {
            let a_bit = matches!(c.y_source, YSource::Memory) as u16;
            Word16::new(
                0b111 << 13
                    | a_bit << 12
                    | c.alu.to_bits() << 6
                    | c.dest.to_bits() << 3
                    | c.jump.to_bits(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_address() {
        let instr = decode(Word16::new(21));
        assert_eq!(instr, Instruction::Address(21));
        assert!(instr.is_address());

        let signals = instr.signals();
        assert_eq!(signals.address_source, AddressSource::Literal);
        assert!(signals.loads_a());
        assert!(!signals.dest_d && !signals.dest_m);
        assert_eq!(signals.jump(), Jump::default());
    }

    #[test]
    fn test_decode_max_literal() {
        assert_eq!(decode(Word16::new(0x7FFF)), Instruction::Address(0x7FFF));
    }

    #[test]
    fn test_decode_d_equals_a() {
        // D=A
        let instr = decode(Word16::new(0b1110_1100_0001_0000));
        let Instruction::Compute(c) = instr else {
            panic!("expected compute instruction");
        };
        assert_eq!(c.y_source, YSource::Register);
        assert_eq!(c.alu, AluFlags::Y);
        assert_eq!(c.dest, Dest { a: false, d: true, m: false });
        assert_eq!(c.jump, Jump::default());
    }

    #[test]
    fn test_decode_am_equals_m_minus_one_jne() {
        // AM=M-1;JNE
        let instr = decode(Word16::new(0b1111_1100_1010_1101));
        let signals = instr.signals();
        assert_eq!(signals.y_source, YSource::Memory);
        assert_eq!(signals.alu_flags(), AluFlags::Y_MINUS_ONE);
        assert!(signals.dest_a && signals.dest_m && !signals.dest_d);
        assert!(signals.jump_lt && !signals.jump_eq && signals.jump_gt);
        assert_eq!(signals.address_source, AddressSource::Computed);
        assert!(signals.loads_a());
    }

    #[test]
    fn test_unused_bits_ignored() {
        // 0;JMP with bits 14..13 clear decodes the same as with them set
        let canonical = decode(Word16::new(0b1110_1010_1000_0111));
        let sloppy = decode(Word16::new(0b1000_1010_1000_0111));
        assert_eq!(canonical, sloppy);
    }

    #[test]
    fn test_jump_conditions() {
        let jgt = Jump::from_bits(0b001);
        let jeq = Jump::from_bits(0b010);
        let jge = Jump::from_bits(0b011);
        let jlt = Jump::from_bits(0b100);
        let jne = Jump::from_bits(0b101);
        let jle = Jump::from_bits(0b110);
        let jmp = Jump::from_bits(0b111);

        // (zr, ng) for negative, zero, positive
        let neg = (false, true);
        let zero = (true, false);
        let pos = (false, false);

        let table = [
            (jgt, [false, false, true]),
            (jeq, [false, true, false]),
            (jge, [false, true, true]),
            (jlt, [true, false, false]),
            (jne, [true, false, true]),
            (jle, [true, true, false]),
            (jmp, [true, true, true]),
            (Jump::default(), [false, false, false]),
        ];
        for (jump, expected) in table {
            let got = [neg, zero, pos].map(|(zr, ng)| jump.is_taken(zr, ng));
            assert_eq!(got, expected, "jump {:?}", jump);
        }
    }

    proptest! {
        #[test]
        fn every_word_decodes(bits in any::<u16>()) {
            let instr = decode(Word16::new(bits));
            prop_assert_eq!(instr.is_address(), bits & 0x8000 == 0);
        }

        #[test]
        fn encode_inverts_decode(bits in any::<u16>()) {
            // Canonical words have bits 14..13 set on compute instructions
            let canonical = if bits & 0x8000 != 0 { bits | 0x6000 } else { bits };
            let word = Word16::new(canonical);
            prop_assert_eq!(encode(&decode(word)), word);
        }
    }
}
