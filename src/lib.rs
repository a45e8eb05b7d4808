//! # Hack Emulator
//!
//! A cycle-accurate emulator of the Hack computer, the 16-bit machine
//! built up from NAND gates in "The Elements of Computing Systems".
//!
//! The machine is a Harvard design: a read-only instruction ROM, a data
//! memory that maps RAM, a screen framebuffer and a keyboard register into
//! one 15-bit address space, and a CPU with two registers and an ALU
//! driven directly by instruction bits.

pub mod word;
pub mod cpu;
pub mod asm;
pub mod config;
pub mod machine;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use word::Word16;
pub use cpu::{Cpu, CpuOutputs, Instruction, MemoryController, MemoryError, Registers, Screen, UnmappedPolicy};
pub use asm::{disassemble, load_hack, parse_hack, save_hack, HackFile, HackFileError};
pub use config::{ConfigError, MachineConfig};
pub use machine::{Machine, MachineError, RunState, StepInfo};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
