//! The Hack arithmetic/logic unit.
//!
//! A purely combinational function of two words and six control bits.
//! Every one of the 64 flag combinations is legal; 18 of them produce the
//! functions the instruction set names (see [`AluFlags`] constants).

use crate::word::Word16;
use serde::{Serialize, Deserialize};

/// The six ALU control bits, in instruction order (bit 11 down to bit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AluFlags {
    /// Zero the x input.
    pub zx: bool,
    /// Negate (bitwise) the x input.
    pub nx: bool,
    /// Zero the y input.
    pub zy: bool,
    /// Negate (bitwise) the y input.
    pub ny: bool,
    /// Function select: add when set, AND when clear.
    pub f: bool,
    /// Negate (bitwise) the output.
    pub no: bool,
}

impl AluFlags {
    pub const ZERO: Self = Self::from_bits(0b101010);
    pub const ONE: Self = Self::from_bits(0b111111);
    pub const MINUS_ONE: Self = Self::from_bits(0b111010);
    pub const X: Self = Self::from_bits(0b001100);
    pub const Y: Self = Self::from_bits(0b110000);
    pub const NOT_X: Self = Self::from_bits(0b001101);
    pub const NOT_Y: Self = Self::from_bits(0b110001);
    pub const NEG_X: Self = Self::from_bits(0b001111);
    pub const NEG_Y: Self = Self::from_bits(0b110011);
    pub const X_PLUS_ONE: Self = Self::from_bits(0b011111);
    pub const Y_PLUS_ONE: Self = Self::from_bits(0b110111);
    pub const X_MINUS_ONE: Self = Self::from_bits(0b001110);
    pub const Y_MINUS_ONE: Self = Self::from_bits(0b110010);
    pub const X_PLUS_Y: Self = Self::from_bits(0b000010);
    pub const X_MINUS_Y: Self = Self::from_bits(0b010011);
    pub const Y_MINUS_X: Self = Self::from_bits(0b000111);
    pub const X_AND_Y: Self = Self::from_bits(0b000000);
    pub const X_OR_Y: Self = Self::from_bits(0b010101);

    /// Build from a 6-bit field laid out `zx nx zy ny f no` (zx is bit 5).
    /// Bits above bit 5 are ignored.
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            zx: bits & 0b100000 != 0,
            nx: bits & 0b010000 != 0,
            zy: bits & 0b001000 != 0,
            ny: bits & 0b000100 != 0,
            f: bits & 0b000010 != 0,
            no: bits & 0b000001 != 0,
        }
    }

    /// Pack back into the 6-bit field.
    pub const fn to_bits(self) -> u16 {
        (self.zx as u16) << 5
            | (self.nx as u16) << 4
            | (self.zy as u16) << 3
            | (self.ny as u16) << 2
            | (self.f as u16) << 1
            | (self.no as u16)
    }
}

/// Result of one ALU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub out: Word16,
    /// Set iff `out` is zero.
    pub zr: bool,
    /// Set iff `out` is negative (bit 15).
    pub ng: bool,
}

/// Evaluate the ALU.
pub fn compute(x: Word16, y: Word16, flags: AluFlags) -> AluOutput {
    let mut x = x;
    if flags.zx {
        x = Word16::ZERO;
    }
    if flags.nx {
        x = !x;
    }

    let mut y = y;
    if flags.zy {
        y = Word16::ZERO;
    }
    if flags.ny {
        y = !y;
    }

    let mut out = if flags.f { x.wrapping_add(y) } else { x & y };
    if flags.no {
        out = !out;
    }

    AluOutput {
        out,
        zr: out.is_zero(),
        ng: out.is_negative(),
    }
}
