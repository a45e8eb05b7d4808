//! CPU execution for the Hack machine.
//!
//! One call to [`Cpu::cycle`] is one clock cycle. The cycle is split into a
//! combinational half ([`Cpu::evaluate`]), which only reads the registers,
//! and a clock edge ([`Cpu::commit`]), which latches A, D and PC together.

use crate::cpu::alu::{self, AluOutput};
use crate::cpu::decode::{self, ControlSignals, Instruction, YSource};
use crate::cpu::registers::Registers;
use crate::word::Word16;
use serde::{Serialize, Deserialize};

/// Memory-interface outputs of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuOutputs {
    /// ALU output, the value to write to memory.
    pub out_m: Word16,
    /// Write enable for the data memory.
    pub write_m: bool,
    /// Data address: register A as it was during the cycle.
    pub address_m: u16,
    /// PC after the clock edge.
    pub pc: u16,
}

/// Everything the combinational half of a cycle produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub instruction: Instruction,
    pub signals: ControlSignals,
    pub alu: AluOutput,
    /// Value A latches at the clock edge, if it loads.
    pub next_a: Option<Word16>,
    /// Value D latches at the clock edge, if it loads.
    pub next_d: Option<Word16>,
    pub jump: bool,
    pub out_m: Word16,
    pub write_m: bool,
    pub address_m: u16,
}

/// The Hack CPU: register file plus control logic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub regs: Registers,
}

impl Cpu {
    /// Create a new CPU with zeroed registers.
    pub fn new() -> Self {
        Self { regs: Registers::new() }
    }

    /// Register A.
    pub fn a(&self) -> Word16 {
        self.regs.a.get()
    }

    /// Register D.
    pub fn d(&self) -> Word16 {
        self.regs.d.get()
    }

    /// Program counter.
    pub fn pc(&self) -> u16 {
        self.regs.pc.get()
    }

    /// Current data address output: the low 15 bits of A.
    pub fn address_m(&self) -> u16 {
        self.a().slice(14, 0)
    }

    /// Combinational half of a cycle. Reads registers, changes nothing.
    pub fn evaluate(&self, instruction_word: Word16, in_m: Word16) -> Evaluation {
        let instruction = decode::decode(instruction_word);
        let signals = instruction.signals();

        let a = self.a();
        let y = match signals.y_source {
            YSource::Register => a,
            YSource::Memory => in_m,
        };
        let alu = alu::compute(self.d(), y, signals.alu_flags());

        let (next_a, next_d, write_m, jump) = match instruction {
            Instruction::Address(literal) => (Some(Word16::new(literal)), None, false, false),
            Instruction::Compute(c) => (
                c.dest.a.then_some(alu.out),
                c.dest.d.then_some(alu.out),
                c.dest.m,
                c.jump.is_taken(alu.zr, alu.ng),
            ),
        };

        Evaluation {
            instruction,
            signals,
            alu,
            next_a,
            next_d,
            jump,
            out_m: alu.out,
            write_m,
            address_m: self.address_m(),
        }
    }

    /// Clock edge. All registers latch at once from pre-edge values.
    pub fn commit(&mut self, eval: &Evaluation, reset: bool) {
        let jump_target = self.a();

        if let Some(a) = eval.next_a {
            self.regs.a.tick(a, true);
        }
        if let Some(d) = eval.next_d {
            self.regs.d.tick(d, true);
        }
        self.regs.pc.tick(jump_target, eval.jump, reset);
    }

    /// Run one full cycle and return the memory-interface outputs.
    pub fn cycle(&mut self, instruction_word: Word16, in_m: Word16, reset: bool) -> CpuOutputs {
        let eval = self.evaluate(instruction_word, in_m);
        self.commit(&eval, reset);

        CpuOutputs {
            out_m: eval.out_m,
            write_m: eval.write_m,
            address_m: eval.address_m,
            pc: self.pc(),
        }
    }
}
