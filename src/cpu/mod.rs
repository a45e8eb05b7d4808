//! CPU emulation for the Hack computer.
//!
//! This module implements the complete Hack architecture:
//! - 32K-word instruction ROM, 16K-word RAM, 8K-word screen, keyboard register
//! - 3 registers: A (address), D (data), PC (program counter)
//! - Two instruction forms: address (`@value`) and compute (`dest=comp;jump`)

pub mod alu;
pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;

pub use alu::{AluFlags, AluOutput};
pub use memory::{MemoryController, MemoryError, Ram, Region, Rom, Screen, UnmappedPolicy};
pub use registers::{ProgramCounter, Register, Registers};
pub use decode::{Compute, ControlSignals, Dest, Instruction, Jump, YSource, AddressSource};
pub use execute::{Cpu, CpuOutputs, Evaluation};
