//! Hack CPU registers.
//!
//! The CPU has three clocked registers:
//! - A: address/constant register
//! - D: data register
//! - PC: 15-bit program counter
//!
//! Each samples its inputs during a cycle and only publishes the new value
//! at the clock edge, so reads within a cycle always see the old value.

use crate::word::Word16;
use serde::{Serialize, Deserialize};

/// A 16-bit register with a load-enable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Register {
    value: Word16,
}

impl Register {
    pub const fn new() -> Self {
        Self { value: Word16::ZERO }
    }

    /// The value published by the last clock edge.
    #[inline]
    pub const fn get(&self) -> Word16 {
        self.value
    }

    /// Clock edge: latch `input` if `load` is asserted.
    #[inline]
    pub fn tick(&mut self, input: Word16, load: bool) {
        if load {
            self.value = input;
        }
    }
}

/// A 15-bit program counter.
///
/// On each clock edge, in order of precedence: reset to 0, load an
/// address, or increment (wrapping at 0x8000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgramCounter {
    value: u16,
}

impl ProgramCounter {
    /// Width mask: the PC addresses a 32K-word ROM.
    pub const MASK: u16 = 0x7FFF;

    pub const fn new() -> Self {
        Self { value: 0 }
    }

    #[inline]
    pub const fn get(&self) -> u16 {
        self.value
    }

    /// Clock edge.
    pub fn tick(&mut self, input: Word16, load: bool, reset: bool) {
        self.value = if reset {
            0
        } else if load {
            input.bits() & Self::MASK
        } else {
            self.value.wrapping_add(1) & Self::MASK
        };
    }

    /// Asynchronous override used by the driver's reset and by debuggers.
    pub fn set(&mut self, value: u16) {
        self.value = value & Self::MASK;
    }
}

/// The Hack register file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// A: holds an address or a constant
    pub a: Register,

    /// D: general data register
    pub d: Register,

    /// PC: address of the next instruction in ROM
    pub pc: ProgramCounter,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self {
            a: Register::new(),
            d: Register::new(),
            pc: ProgramCounter::new(),
        }
    }
}
