//! Debugger application state and logic.

use crate::asm::disasm::disassemble_instruction;
use crate::cpu::memory::RAM_SIZE;
use crate::{Machine, MachineConfig, Word16};
use std::collections::HashSet;

/// Debugger application state.
pub struct DebuggerApp {
    /// The machine being debugged.
    pub machine: Machine,
    /// Breakpoints (by ROM address).
    pub breakpoints: HashSet<u16>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// RAM view scroll offset.
    pub mem_scroll: usize,
    /// Cycles executed per UI tick while running.
    pub cycles_per_tick: u64,
}

impl DebuggerApp {
    /// Create a new debugger with a loaded program.
    pub fn new(program: Vec<Word16>, config: MachineConfig) -> Self {
        let mut machine = Machine::with_config(config);
        let status = match machine.load_program(&program) {
            Ok(()) => format!(
                "Loaded {} words. Press 's' to step, 'r' to run, 'q' to quit.",
                machine.rom.program_len()
            ),
            Err(e) => format!("Error: {}", e),
        };

        Self {
            machine,
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status,
            mem_scroll: 0,
            cycles_per_tick: 1000,
        }
    }

    /// Step one cycle.
    pub fn step(&mut self) {
        match self.machine.step() {
            Ok(info) => {
                self.status = format!("PC={:05}: {}", info.pc, disassemble_instruction(info.word));
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until halt, breakpoint, or error.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one batch of continuous execution.
    pub fn tick(&mut self) {
        for _ in 0..self.cycles_per_tick {
            if !self.running {
                return;
            }

            if self.machine.is_halted() {
                self.running = false;
                self.status = format!("Halted after {} cycles", self.machine.cycles);
                return;
            }

            self.step();

            let pc = self.machine.cpu.pc();
            if self.breakpoints.contains(&pc) {
                self.running = false;
                self.status = format!("Breakpoint at PC={}", pc);
                return;
            }
        }
    }

    /// Toggle breakpoint at current PC.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.machine.cpu.pc();
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at PC={}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at PC={}", pc);
        }
    }

    /// Restart the program. Memory and registers are kept.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.running = false;
        self.status = "Reset. Ready.".into();
    }

    /// Set the key code seen at the keyboard register.
    pub fn press_key(&mut self, key: u16) {
        self.machine.set_keyboard(Word16::new(key));
    }

    pub fn scroll_memory(&mut self, delta: isize) {
        self.mem_scroll = self
            .mem_scroll
            .saturating_add_signed(delta)
            .min(RAM_SIZE - 1);
    }

    /// Get disassembly around current PC.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u16, String, bool)> {
        let pc = self.machine.cpu.pc();
        let start = pc.saturating_sub(lines as u16 / 2);

        (0..lines as u16)
            .filter_map(|i| {
                let addr = start.checked_add(i)?;
                if addr > 0x7FFF {
                    return None;
                }
                let disasm = disassemble_instruction(self.machine.rom.fetch(addr));
                Some((addr, disasm, addr == pc))
            })
            .collect()
    }
}

/// Map a terminal key to a Hack key code.
pub fn hack_key_code(code: crossterm::event::KeyCode) -> Option<u16> {
    use crossterm::event::KeyCode;

    let key = match code {
        KeyCode::Char(c) if c.is_ascii() && !c.is_ascii_control() => c.to_ascii_uppercase() as u16,
        KeyCode::Enter => 128,
        KeyCode::Backspace => 129,
        KeyCode::Left => 130,
        KeyCode::Up => 131,
        KeyCode::Right => 132,
        KeyCode::Down => 133,
        KeyCode::Home => 134,
        KeyCode::End => 135,
        KeyCode::PageUp => 136,
        KeyCode::PageDown => 137,
        KeyCode::Insert => 138,
        KeyCode::Delete => 139,
        KeyCode::Esc => 140,
        KeyCode::F(n) if (1..=12).contains(&n) => 140 + n as u16,
        _ => return None,
    };
    Some(key)
}

/// Run the debugger with a program.
pub fn run_debugger(program: Vec<Word16>, config: MachineConfig) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(program, config);
    let mut typing = false;

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app, typing);
        })?;

        if event::poll(Duration::from_millis(30))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press if typing => {
                        // Ctrl-K leaves keyboard mode; everything else goes to the machine
                        if key.code == KeyCode::Char('k') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            typing = false;
                            app.press_key(0);
                            app.status = "Keyboard released.".into();
                        } else if let Some(code) = hack_key_code(key.code) {
                            app.press_key(code);
                        }
                    }
                    KeyEventKind::Release if typing => app.press_key(0),
                    KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('b') => app.toggle_breakpoint(),
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Char('k') => {
                            typing = true;
                            app.status = "Keyboard captured (Ctrl-K to release).".into();
                        }
                        KeyCode::Up => app.scroll_memory(-1),
                        KeyCode::Down => app.scroll_memory(1),
                        KeyCode::PageUp => app.scroll_memory(-16),
                        KeyCode::PageDown => app.scroll_memory(16),
                        _ => {}
                    },
                    _ => {}
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
