//! WebAssembly bindings for the Hack emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.

use wasm_bindgen::prelude::*;
use crate::{Machine, Word16, parse_hack};
use crate::asm::disasm::disassemble_instruction;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly machine wrapper.
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Create a new machine instance.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { machine: Machine::new() }
    }

    /// Load a program from `.hack` text.
    #[wasm_bindgen]
    pub fn load_hack(&mut self, source: &str) -> Result<usize, JsError> {
        let image = parse_hack(source)
            .map_err(|e| JsError::new(&e.to_string()))?;

        self.machine = Machine::new();
        self.machine.load_program(&image.instructions)
            .map_err(|e| JsError::new(&e.to_string()))?;

        Ok(image.len())
    }

    /// Load a program from raw instruction words.
    #[wasm_bindgen]
    pub fn load_words(&mut self, words: &[u16]) -> Result<usize, JsError> {
        let program: Vec<Word16> = words.iter().map(|&w| Word16::new(w)).collect();
        self.machine = Machine::new();
        self.machine.load_program(&program)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(program.len())
    }

    /// Step one cycle. Returns the disassembled instruction.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        let info = self.machine.step()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(disassemble_instruction(info.word))
    }

    /// Run until halted or max cycles. Returns the total cycle count.
    #[wasm_bindgen]
    pub fn run(&mut self, max_cycles: u32) -> Result<f64, JsError> {
        self.machine.run(max_cycles as u64)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.machine.cycles as f64)
    }

    /// Restart the program; memory is kept.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.machine.is_halted()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> f64 {
        self.machine.cycles as f64
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.machine.cpu.pc()
    }

    #[wasm_bindgen]
    pub fn a(&self) -> i16 {
        self.machine.cpu.a().to_i16()
    }

    #[wasm_bindgen]
    pub fn d(&self) -> i16 {
        self.machine.cpu.d().to_i16()
    }

    /// Set the current key code (0 for none).
    #[wasm_bindgen]
    pub fn set_keyboard(&mut self, key: u16) {
        self.machine.set_keyboard(Word16::new(key));
    }

    /// Read a RAM or screen word; 0 for addresses outside them.
    #[wasm_bindgen]
    pub fn peek(&self, address: u16) -> i16 {
        self.machine.peek(address).map(Word16::to_i16).unwrap_or(0)
    }

    #[wasm_bindgen]
    pub fn poke(&mut self, address: u16, value: i16) -> Result<(), JsError> {
        self.machine.poke(address, Word16::from_i16(value))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// The framebuffer as 8192 words, ready for a canvas renderer.
    #[wasm_bindgen]
    pub fn screen(&self) -> js_sys::Uint16Array {
        let words: Vec<u16> = self.machine.screen().as_slice().iter().map(|w| w.bits()).collect();
        js_sys::Uint16Array::from(words.as_slice())
    }

    /// Get registers as JSON string.
    #[wasm_bindgen]
    pub fn registers_json(&self) -> String {
        serde_json::json!({
            "a": self.machine.cpu.a().to_i16(),
            "d": self.machine.cpu.d().to_i16(),
            "pc": self.machine.cpu.pc(),
            "state": self.machine.state,
            "cycles": self.machine.cycles,
        })
        .to_string()
    }
}

impl Default for WasmMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Disassemble a single instruction word.
#[wasm_bindgen]
pub fn wasm_disassemble(word: u16) -> String {
    disassemble_instruction(Word16::new(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_json() {
        let mut wasm = WasmMachine::new();
        // @21, D=A, @2, 0;JMP at 2..3
        assert!(wasm.load_words(&[21, 0b1110_1100_0001_0000, 2, 0b1110_1010_1000_0111]).is_ok());
        assert!(wasm.run(100).is_ok());

        let value: serde_json::Value = serde_json::from_str(&wasm.registers_json()).unwrap();
        assert_eq!(value["a"], 2);
        assert_eq!(value["d"], 21);
        assert_eq!(value["pc"], 2);
        assert_eq!(value["state"], "Halted");
        assert_eq!(value["cycles"], 4);
    }
}
