//! TUI debugger for the Hack emulator.
//!
//! Provides an interactive terminal-based debugger with:
//! - Register and cycle counter display
//! - Disassembly around the PC with breakpoints
//! - A scaled-down view of the screen framebuffer
//! - RAM view and keyboard capture

mod app;
mod ui;

pub use app::{DebuggerApp, hack_key_code, run_debugger};
