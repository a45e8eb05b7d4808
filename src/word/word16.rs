//! The 16-bit two's-complement word.
//!
//! Bits are numbered from the least significant (bit 0) to the sign bit
//! (bit 15). All arithmetic wraps modulo 2^16, matching the hardware adder.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use serde::{Serialize, Deserialize};

/// A 16-bit machine word.
///
/// Used for:
/// - Register A and D contents
/// - RAM, screen and keyboard cells
/// - Instruction words in ROM
///
/// Signed range: -32,768 to +32,767
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word16(u16);

impl Word16 {
    /// Number of bits in a word.
    pub const WIDTH: usize = 16;

    /// All bits clear.
    pub const ZERO: Self = Self(0);

    /// All bits set (-1).
    pub const ONES: Self = Self(0xFFFF);

    /// Create a word from its raw bit pattern.
    #[inline]
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// Create a word from a signed value.
    #[inline]
    pub const fn from_i16(value: i16) -> Self {
        Self(value as u16)
    }

    /// Get the raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Interpret the word as a signed value.
    #[inline]
    pub const fn to_i16(self) -> i16 {
        self.0 as i16
    }

    /// Get a single bit (0 = LSB).
    ///
    /// # Panics
    /// Panics if `index` is 16 or more.
    #[inline]
    pub const fn bit(self, index: usize) -> bool {
        assert!(index < Self::WIDTH, "bit index out of range");
        (self.0 >> index) & 1 == 1
    }

    /// Extract the inclusive bit range `hi..=lo`, shifted down to bit 0.
    ///
    /// `slice(14, 0)` yields the 15-bit literal of an address instruction.
    ///
    /// # Panics
    /// Panics if `hi < lo` or `hi` is 16 or more.
    #[inline]
    pub const fn slice(self, hi: usize, lo: usize) -> u16 {
        assert!(hi < Self::WIDTH && lo <= hi, "invalid bit slice");
        let width = hi - lo + 1;
        let mask = if width == Self::WIDTH { u16::MAX } else { (1u16 << width) - 1 };
        (self.0 >> lo) & mask
    }

    /// Check whether every bit is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check the sign bit.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.bit(15)
    }

    /// Two's-complement addition, wrapping on overflow.
    #[inline]
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Parse a 16-character binary string, most significant bit first.
    ///
    /// This is the line format of `.hack` program files.
    pub fn parse_binary(s: &str) -> Result<Self, ParseError> {
        let count = s.chars().count();
        if count != Self::WIDTH {
            return Err(ParseError::WrongLength { expected: Self::WIDTH, got: count });
        }

        let mut bits = 0u16;
        for c in s.chars() {
            bits <<= 1;
            match c {
                '0' => {}
                '1' => bits |= 1,
                other => return Err(ParseError::InvalidChar(other)),
            }
        }
        Ok(Self(bits))
    }
}

impl From<u16> for Word16 {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<i16> for Word16 {
    fn from(value: i16) -> Self {
        Self::from_i16(value)
    }
}

impl From<Word16> for u16 {
    fn from(word: Word16) -> Self {
        word.0
    }
}

impl Not for Word16 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl BitAnd for Word16 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Word16 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Binary, MSB first, exactly as it appears in a `.hack` file.
impl fmt::Display for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

impl fmt::Debug for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word16({:#06x} = {})", self.0, self.to_i16())
    }
}

/// Errors that can occur when parsing binary word strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input string was the wrong length.
    #[error("expected {expected} bits, got {got}")]
    WrongLength { expected: usize, got: usize },

    /// An invalid character was encountered.
    #[error("invalid bit character: '{0}' (expected 0/1)")]
    InvalidChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_conversion() {
        assert_eq!(Word16::from_i16(-1).bits(), 0xFFFF);
        assert_eq!(Word16::new(0x8000).to_i16(), i16::MIN);
        assert_eq!(Word16::from_i16(12345).to_i16(), 12345);
    }

    #[test]
    fn test_wrapping_add() {
        let max = Word16::from_i16(i16::MAX);
        assert_eq!(max.wrapping_add(Word16::new(1)).to_i16(), i16::MIN);
        assert_eq!(Word16::ONES.wrapping_add(Word16::new(1)), Word16::ZERO);
    }

    #[test]
    fn test_bit_indexing() {
        let word = Word16::new(0b1000_0000_0000_0101);
        assert!(word.bit(0));
        assert!(!word.bit(1));
        assert!(word.bit(2));
        assert!(word.bit(15));
        assert!(word.is_negative());
        assert!(!Word16::new(0b101).is_negative());
    }

    #[test]
    fn test_slice() {
        let word = Word16::new(0b1110_1111_1100_1010);
        assert_eq!(word.slice(15, 15), 1);
        assert_eq!(word.slice(2, 0), 0b010);
        assert_eq!(word.slice(5, 3), 0b001);
        assert_eq!(word.slice(11, 6), 0b111111);
        assert_eq!(word.slice(14, 0), 0b110_1111_1100_1010);
        assert_eq!(word.slice(15, 0), word.bits());
    }

    #[test]
    #[should_panic(expected = "bit index out of range")]
    fn test_bit_out_of_range() {
        let _ = Word16::ZERO.bit(16);
    }

    #[test]
    fn test_parse_binary() {
        assert_eq!(Word16::parse_binary("0000000000010101").unwrap().bits(), 21);
        assert_eq!(Word16::parse_binary("1111111111111111").unwrap(), Word16::ONES);
        assert_eq!(
            Word16::parse_binary("0101"),
            Err(ParseError::WrongLength { expected: 16, got: 4 })
        );
        assert_eq!(
            Word16::parse_binary("000000000001010x"),
            Err(ParseError::InvalidChar('x'))
        );
    }

    #[test]
    fn test_display_matches_hack_format() {
        let word = Word16::new(0b1110_1100_0001_0000);
        assert_eq!(word.to_string(), "1110110000010000");
        assert_eq!(Word16::parse_binary(&word.to_string()).unwrap(), word);
    }
}
