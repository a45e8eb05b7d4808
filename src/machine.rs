//! The clock driver.
//!
//! [`Machine`] owns the CPU, ROM and data memory and advances them one
//! clock cycle per [`Machine::step`]:
//!
//! 1. fetch `rom[pc]`
//! 2. read the data word addressed by A (if the instruction uses M)
//! 3. evaluate the CPU combinationally
//! 4. at the clock edge, commit the memory write and the register loads

use crate::asm::disasm::disassemble_instruction;
use crate::config::MachineConfig;
use crate::cpu::decode::{self, Instruction, YSource};
use crate::cpu::memory::{MemoryError, Region, ADDRESS_MASK};
use crate::cpu::{Cpu, CpuOutputs, Evaluation, MemoryController, Rom, Screen};
use crate::word::Word16;
use log::{debug, log_enabled, trace, Level};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Machine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Executing normally.
    Running,
    /// Stuck in a jump-to-self loop, the platform's idiom for "done".
    /// Stepping is still allowed and keeps looping.
    Halted,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// PC the instruction was fetched from.
    pub pc: u16,
    /// The raw instruction word.
    pub word: Word16,
    pub instruction: Instruction,
    pub outputs: CpuOutputs,
}

/// A complete Hack computer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Machine {
    pub cpu: Cpu,
    pub rom: Rom,
    pub mem: MemoryController,
    /// Current execution state.
    pub state: RunState,
    /// Cycles executed since the program was loaded.
    pub cycles: u64,
    reset_line: bool,
    last_step: Option<StepInfo>,
    config: MachineConfig,
}

impl Machine {
    /// Create a zeroed machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            cpu: Cpu::new(),
            rom: Rom::new(),
            mem: MemoryController::new(config.unmapped),
            state: RunState::Running,
            cycles: 0,
            reset_line: false,
            last_step: None,
            config,
        }
    }

    /// Replace the ROM image and restart at PC 0.
    ///
    /// RAM, screen and the A/D registers are left as they are.
    pub fn load_program(&mut self, program: &[Word16]) -> Result<(), MachineError> {
        self.rom.load(program)?;
        self.cpu.regs.pc.set(0);
        self.state = RunState::Running;
        self.cycles = 0;
        self.last_step = None;
        debug!("loaded {} instruction words", program.len());
        Ok(())
    }

    /// Advance exactly one clock cycle.
    ///
    /// An error leaves the machine exactly as it was before the call.
    pub fn step(&mut self) -> Result<StepInfo, MachineError> {
        let pc = self.cpu.pc();
        let word = self.rom.fetch(pc);
        let instruction = decode::decode(word);

        let reads_m = matches!(instruction, Instruction::Compute(c) if c.y_source == YSource::Memory);
        let in_m = if reads_m {
            self.mem.read(self.cpu.address_m())?
        } else {
            Word16::ZERO
        };

        let eval = self.cpu.evaluate(word, in_m);

        // Clock edge
        self.mem.write(eval.address_m, eval.out_m, eval.write_m)?;
        let reset = self.reset_line;
        self.cpu.commit(&eval, reset);
        self.cycles += 1;

        let info = StepInfo {
            pc,
            word,
            instruction,
            outputs: CpuOutputs {
                out_m: eval.out_m,
                write_m: eval.write_m,
                address_m: eval.address_m,
                pc: self.cpu.pc(),
            },
        };

        if log_enabled!(Level::Trace) {
            trace!(
                "{:>6} {:05}: {:<16} A={} D={} PC={}",
                self.cycles,
                pc,
                disassemble_instruction(word),
                self.cpu.a().to_i16(),
                self.cpu.d().to_i16(),
                self.cpu.pc(),
            );
        }

        if reset {
            self.state = RunState::Running;
        } else if self.config.halt_detection && eval.jump && self.is_idle_loop(pc, &eval) {
            debug!("halted in idle loop at {} after {} cycles", pc, self.cycles);
            self.state = RunState::Halted;
        }

        self.last_step = Some(info);
        Ok(info)
    }

    /// A taken jump with no destinations that lands on itself, or on the
    /// `@target` immediately before it, loops forever.
    fn is_idle_loop(&self, pc: u16, eval: &Evaluation) -> bool {
        let signals = &eval.signals;
        if signals.dest_a || signals.dest_d || signals.dest_m {
            return false;
        }

        let target = eval.address_m;
        // A condition on the keyboard can change under the program.
        if signals.y_source == YSource::Memory && Region::decode(target) == Region::Keyboard {
            return false;
        }

        target == pc
            || (target.wrapping_add(1) & ADDRESS_MASK == pc
                && decode::decode(self.rom.fetch(target)) == Instruction::Address(target))
    }

    /// Run until halted or `max_cycles` cycles have executed.
    ///
    /// Returns the number of cycles executed.
    pub fn run(&mut self, max_cycles: u64) -> Result<u64, MachineError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == RunState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Restart the program: PC to 0, reset line released.
    ///
    /// Memory and the A/D registers keep their contents.
    pub fn reset(&mut self) {
        self.cpu.regs.pc.set(0);
        self.reset_line = false;
        self.state = RunState::Running;
        self.last_step = None;
        debug!("reset after {} cycles", self.cycles);
    }

    /// Drive the synchronous reset input. While asserted, every cycle ends
    /// with PC = 0 regardless of any jump.
    pub fn set_reset(&mut self, asserted: bool) {
        self.reset_line = asserted;
    }

    pub fn reset_asserted(&self) -> bool {
        self.reset_line
    }

    /// Read a RAM or screen word.
    pub fn peek(&self, address: u16) -> Result<Word16, MemoryError> {
        match Self::storage_region(address)? {
            Region::Ram(index) => Ok(self.mem.ram.read(index)),
            Region::Screen(offset) => Ok(self.mem.screen.read(offset)),
            _ => Err(MemoryError::AddressOutOfRange(address)),
        }
    }

    /// Write a RAM or screen word directly, outside the clock.
    pub fn poke(&mut self, address: u16, value: Word16) -> Result<(), MemoryError> {
        match Self::storage_region(address)? {
            Region::Ram(index) => self.mem.ram.write(index, value),
            Region::Screen(offset) => self.mem.screen.write(offset, value),
            _ => return Err(MemoryError::AddressOutOfRange(address)),
        }
        Ok(())
    }

    fn storage_region(address: u16) -> Result<Region, MemoryError> {
        if address > ADDRESS_MASK {
            return Err(MemoryError::AddressOutOfRange(address));
        }
        Ok(Region::decode(address))
    }

    pub fn set_keyboard(&mut self, key: Word16) {
        self.mem.set_keyboard(key);
    }

    pub fn keyboard(&self) -> Word16 {
        self.mem.keyboard()
    }

    pub fn screen(&self) -> &Screen {
        &self.mem.screen
    }

    /// The most recent cycle, if any since load or reset.
    pub fn last_step(&self) -> Option<&StepInfo> {
        self.last_step.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur while driving the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("memory error: {0}")]
    MemoryError(#[from] MemoryError),
}
