//! Program image I/O and disassembly.
//!
//! This module provides:
//! - The `.hack` text format produced by the external assembler
//! - A disassembler (words → readable `dest=comp;jump` text)

pub mod disasm;
pub mod hackfile;

pub use disasm::{disassemble, disassemble_instruction};
pub use hackfile::{load_hack, parse_hack, save_hack, HackFile, HackFileError};
