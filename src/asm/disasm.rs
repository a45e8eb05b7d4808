//! Disassembler for Hack programs.
//!
//! Converts instruction words back to symbolic form: `@21`, `D=D+M`,
//! `0;JMP`, `AM=M-1;JNE`. ALU flag combinations outside the canonical
//! table are shown as `alu(zxnxzynyfno)` with the y operand named.

use crate::cpu::alu::AluFlags;
use crate::cpu::decode::{decode, Compute, Dest, Instruction, Jump, YSource};
use crate::word::Word16;

/// Disassemble a single instruction to text.
pub fn disassemble_instruction(instr: Word16) -> String {
    format_instruction(&decode(instr))
}

/// Disassemble a slice of instructions, one line per ROM address.
pub fn disassemble(instructions: &[Word16]) -> String {
    let mut output = String::new();
    output.push_str("// Hack Disassembly\n");
    output.push_str("// ----------------\n\n");

    for (addr, instr) in instructions.iter().enumerate() {
        let line = disassemble_instruction(*instr);
        output.push_str(&format!("{:05}: {:<16} // {}\n", addr, line, instr));
    }

    output
}

/// Format a decoded instruction as assembly text.
pub fn format_instruction(instr: &Instruction) -> String {
    match instr {
        Instruction::Address(value) => format!("@{}", value),
        Instruction::Compute(c) => format_compute(c),
    }
}

fn format_compute(c: &Compute) -> String {
    let mut text = String::new();
    if !c.dest.is_empty() {
        text.push_str(dest_mnemonic(c.dest));
        text.push('=');
    }
    text.push_str(&comp_mnemonic(c.alu, c.y_source));
    if let Some(jump) = jump_mnemonic(c.jump) {
        text.push(';');
        text.push_str(jump);
    }
    text
}

fn dest_mnemonic(dest: Dest) -> &'static str {
    match (dest.a, dest.d, dest.m) {
        (false, false, false) => "",
        (false, false, true) => "M",
        (false, true, false) => "D",
        (false, true, true) => "MD",
        (true, false, false) => "A",
        (true, false, true) => "AM",
        (true, true, false) => "AD",
        (true, true, true) => "AMD",
    }
}

fn jump_mnemonic(jump: Jump) -> Option<&'static str> {
    match (jump.lt, jump.eq, jump.gt) {
        (false, false, false) => None,
        (false, false, true) => Some("JGT"),
        (false, true, false) => Some("JEQ"),
        (false, true, true) => Some("JGE"),
        (true, false, false) => Some("JLT"),
        (true, false, true) => Some("JNE"),
        (true, true, false) => Some("JLE"),
        (true, true, true) => Some("JMP"),
    }
}

/// Comp field text, with `Y` standing for A or M.
fn comp_template(flags: AluFlags) -> Option<&'static str> {
    let text = match flags {
        AluFlags::ZERO => "0",
        AluFlags::ONE => "1",
        AluFlags::MINUS_ONE => "-1",
        AluFlags::X => "D",
        AluFlags::Y => "Y",
        AluFlags::NOT_X => "!D",
        AluFlags::NOT_Y => "!Y",
        AluFlags::NEG_X => "-D",
        AluFlags::NEG_Y => "-Y",
        AluFlags::X_PLUS_ONE => "D+1",
        AluFlags::Y_PLUS_ONE => "Y+1",
        AluFlags::X_MINUS_ONE => "D-1",
        AluFlags::Y_MINUS_ONE => "Y-1",
        AluFlags::X_PLUS_Y => "D+Y",
        AluFlags::X_MINUS_Y => "D-Y",
        AluFlags::Y_MINUS_X => "Y-D",
        AluFlags::X_AND_Y => "D&Y",
        AluFlags::X_OR_Y => "D|Y",
        _ => return None,
    };
    Some(text)
}

fn comp_mnemonic(flags: AluFlags, y_source: YSource) -> String {
    let y = match y_source {
        YSource::Register => "A",
        YSource::Memory => "M",
    };
    match comp_template(flags) {
        Some(template) => template.replace('Y', y),
        None => format!("alu({:06b},{})", flags.to_bits(), y),
    }
}
