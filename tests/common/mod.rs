//! Fixture helpers: build instruction words without an assembler.

#![allow(dead_code)]

use hack::cpu::decode::{encode, Compute, Dest, Jump, YSource};
use hack::cpu::{AluFlags, Instruction};
use hack::{Machine, Word16};

/// `@value`
pub fn at(value: u16) -> Word16 {
    encode(&Instruction::Address(value))
}

/// `dest=comp;jump`, with empty strings for omitted fields.
pub fn c(dest: &str, comp: &str, jump: &str) -> Word16 {
    let y_source = if comp.contains('M') { YSource::Memory } else { YSource::Register };
    let normalized = comp.replace('M', "A");
    let alu = match normalized.as_str() {
        "0" => AluFlags::ZERO,
        "1" => AluFlags::ONE,
        "-1" => AluFlags::MINUS_ONE,
        "D" => AluFlags::X,
        "A" => AluFlags::Y,
        "!D" => AluFlags::NOT_X,
        "!A" => AluFlags::NOT_Y,
        "-D" => AluFlags::NEG_X,
        "-A" => AluFlags::NEG_Y,
        "D+1" => AluFlags::X_PLUS_ONE,
        "A+1" => AluFlags::Y_PLUS_ONE,
        "D-1" => AluFlags::X_MINUS_ONE,
        "A-1" => AluFlags::Y_MINUS_ONE,
        "D+A" => AluFlags::X_PLUS_Y,
        "D-A" => AluFlags::X_MINUS_Y,
        "A-D" => AluFlags::Y_MINUS_X,
        "D&A" => AluFlags::X_AND_Y,
        "D|A" => AluFlags::X_OR_Y,
        other => panic!("unknown comp {:?}", other),
    };

    let dest = Dest {
        a: dest.contains('A'),
        d: dest.contains('D'),
        m: dest.contains('M'),
    };

    let jump = match jump {
        "" => Jump::default(),
        "JGT" => Jump::from_bits(0b001),
        "JEQ" => Jump::from_bits(0b010),
        "JGE" => Jump::from_bits(0b011),
        "JLT" => Jump::from_bits(0b100),
        "JNE" => Jump::from_bits(0b101),
        "JLE" => Jump::from_bits(0b110),
        "JMP" => Jump::from_bits(0b111),
        other => panic!("unknown jump {:?}", other),
    };

    encode(&Instruction::Compute(Compute { y_source, alu, dest, jump }))
}

/// A machine with `program` loaded.
pub fn machine_with(program: &[Word16]) -> Machine {
    let mut machine = Machine::new();
    machine.load_program(program).expect("program fits in ROM");
    machine
}

/// RAM[2] = RAM[0] * RAM[1], by repeated addition. RAM[0] is consumed.
pub fn multiply_program() -> Vec<Word16> {
    vec![
        at(2),            // 0
        c("M", "0", ""),  // 1  R2 = 0
        at(0),            // 2  (LOOP)
        c("D", "M", ""),  // 3
        at(14),           // 4
        c("", "D", "JEQ"), // 5  if R0 == 0 goto END
        at(1),            // 6
        c("D", "M", ""),  // 7
        at(2),            // 8
        c("M", "D+M", ""), // 9  R2 += R1
        at(0),            // 10
        c("M", "M-1", ""), // 11 R0 -= 1
        at(2),            // 12
        c("", "0", "JMP"), // 13 goto LOOP
        at(14),           // 14 (END)
        c("", "0", "JMP"), // 15
    ]
}

/// RAM[2] = max(RAM[0], RAM[1]).
pub fn max_program() -> Vec<Word16> {
    vec![
        at(0),             // 0
        c("D", "M", ""),   // 1
        at(1),             // 2
        c("D", "D-M", ""), // 3
        at(10),            // 4
        c("", "D", "JGT"), // 5  if R0 > R1 goto R0_BIGGER
        at(1),             // 6
        c("D", "M", ""),   // 7
        at(12),            // 8
        c("", "0", "JMP"), // 9  goto STORE
        at(0),             // 10 (R0_BIGGER)
        c("D", "M", ""),   // 11
        at(2),             // 12 (STORE)
        c("M", "D", ""),   // 13
        at(14),            // 14 (END)
        c("", "0", "JMP"), // 15
    ]
}

/// While a key is held, blacken the first screen row. Uses RAM[16] as a
/// pointer.
pub fn first_row_program() -> Vec<Word16> {
    vec![
        at(0x6000),          // 0  @KBD
        c("D", "M", ""),     // 1
        at(17),              // 2
        c("", "D", "JEQ"),   // 3  no key: goto END
        at(0x4000),          // 4  @SCREEN
        c("D", "A", ""),     // 5
        at(16),              // 6
        c("M", "D", ""),     // 7  ptr = SCREEN
        at(16),              // 8  (LOOP)
        c("A", "M", ""),     // 9
        c("M", "-1", ""),    // 10 *ptr = -1
        at(16),              // 11
        c("MD", "M+1", ""),  // 12 ptr += 1
        at(0x4000 + 32),     // 13
        c("D", "D-A", ""),   // 14
        at(8),               // 15
        c("", "D", "JLT"),   // 16 loop while ptr < SCREEN + 32
        at(17),              // 17 (END)
        c("", "0", "JMP"),   // 18
    ]
}
