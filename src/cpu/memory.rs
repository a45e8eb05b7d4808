//! Hack memory subsystem.
//!
//! Data memory is a 15-bit address space split into disjoint ranges:
//!
//! ```text
//! 0x0000..=0x3FFF  RAM       16K words
//! 0x4000..=0x5FFF  Screen     8K words, memory-mapped framebuffer
//! 0x6000           Keyboard   1 word, read-only
//! 0x6001..=0x7FFF  unmapped
//! ```
//!
//! Instructions live in a separate 32K-word ROM indexed by the PC.

use crate::word::Word16;
use log::debug;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Number of RAM words.
pub const RAM_SIZE: usize = 0x4000;

/// Base address of the screen framebuffer.
pub const SCREEN_BASE: u16 = 0x4000;

/// Number of screen words.
pub const SCREEN_SIZE: usize = 0x2000;

/// Address of the keyboard register.
pub const KEYBOARD_ADDR: u16 = 0x6000;

/// Number of ROM words.
pub const ROM_SIZE: usize = 0x8000;

/// Mask applied to data addresses (the address bus is 15 bits wide).
pub const ADDRESS_MASK: u16 = 0x7FFF;

/// The range a data address falls into, with the offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Ram(usize),
    Screen(usize),
    Keyboard,
    Unmapped(u16),
}

impl Region {
    /// Decode a data address. Bits above bit 14 are ignored.
    pub const fn decode(address: u16) -> Self {
        let address = address & ADDRESS_MASK;
        match address >> 13 {
            0b00 | 0b01 => Region::Ram(address as usize),
            0b10 => Region::Screen((address - SCREEN_BASE) as usize),
            _ if address == KEYBOARD_ADDR => Region::Keyboard,
            _ => Region::Unmapped(address),
        }
    }
}

/// What to do with accesses to the unmapped range 0x6001..=0x7FFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Reads return 0, writes are dropped.
    #[default]
    Ignore,
    /// The access is reported as [`MemoryError::UnmappedAccess`].
    Fault,
}

/// A block of word-addressed storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ram {
    cells: Vec<Word16>,
}

impl Ram {
    /// Create a zeroed block of `size` words.
    pub fn new(size: usize) -> Self {
        Self { cells: vec![Word16::ZERO; size] }
    }

    /// Read a cell by index.
    ///
    /// # Panics
    /// Panics if index is out of range.
    #[inline]
    pub fn read(&self, index: usize) -> Word16 {
        assert!(index < self.cells.len(), "RAM index {} out of range (0-{})", index, self.cells.len() - 1);
        self.cells[index]
    }

    /// Write a cell by index.
    ///
    /// # Panics
    /// Panics if index is out of range.
    #[inline]
    pub fn write(&mut self, index: usize, value: Word16) {
        assert!(index < self.cells.len(), "RAM index {} out of range (0-{})", index, self.cells.len() - 1);
        self.cells[index] = value;
    }

    /// Dump a range of cells (for debugging). The range is clamped.
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, Word16)> {
        let end = start.saturating_add(count).min(self.cells.len());
        (start.min(end)..end).map(|i| (i, self.cells[i])).collect()
    }

    pub fn as_slice(&self) -> &[Word16] {
        &self.cells
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|cell| !cell.is_zero()).count();
        f.debug_struct("Ram")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &self.cells.len())
            .finish()
    }
}

/// The memory-mapped framebuffer.
///
/// 512x256 monochrome pixels, 32 words per row, row-major. Within a word,
/// bit 0 is the leftmost pixel of its 16-pixel group. A set bit is black.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    words: Ram,
}

impl Screen {
    pub const WIDTH: usize = 512;
    pub const HEIGHT: usize = 256;
    pub const WORDS_PER_ROW: usize = Self::WIDTH / Word16::WIDTH;

    pub fn new() -> Self {
        Self { words: Ram::new(SCREEN_SIZE) }
    }

    /// Read a framebuffer word by offset (0..8192).
    #[inline]
    pub fn read(&self, offset: usize) -> Word16 {
        self.words.read(offset)
    }

    /// Write a framebuffer word by offset (0..8192).
    #[inline]
    pub fn write(&mut self, offset: usize, value: Word16) {
        self.words.write(offset, value);
    }

    /// Whether the pixel at column `x`, row `y` is black.
    ///
    /// # Panics
    /// Panics if the coordinates are off screen.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(x < Self::WIDTH && y < Self::HEIGHT, "pixel ({}, {}) off screen", x, y);
        let word = self.words.read(y * Self::WORDS_PER_ROW + x / Word16::WIDTH);
        word.bit(x % Word16::WIDTH)
    }

    /// Render as text, `cols` x `rows` characters. Each character covers a
    /// block of pixels and is `#` if any pixel in it is black.
    pub fn render(&self, cols: usize, rows: usize) -> Vec<String> {
        let cols = cols.clamp(1, Self::WIDTH);
        let rows = rows.clamp(1, Self::HEIGHT);
        let block_w = Self::WIDTH.div_ceil(cols);
        let block_h = Self::HEIGHT.div_ceil(rows);

        (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let ys = (row * block_h)..((row + 1) * block_h).min(Self::HEIGHT);
                        let xs = (col * block_w)..((col + 1) * block_w).min(Self::WIDTH);
                        let lit = ys
                            .clone()
                            .any(|y| xs.clone().any(|x| self.pixel(x, y)));
                        if lit { '#' } else { '.' }
                    })
                    .collect::<String>()
            })
            .collect()
    }

    pub fn as_slice(&self) -> &[Word16] {
        self.words.as_slice()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only program memory.
#[derive(Clone, Serialize, Deserialize)]
pub struct Rom {
    words: Vec<Word16>,
    loaded: usize,
}

impl Rom {
    pub fn new() -> Self {
        Self { words: vec![Word16::ZERO; ROM_SIZE], loaded: 0 }
    }

    /// Replace the image. Words past the program read as zero.
    pub fn load(&mut self, program: &[Word16]) -> Result<(), MemoryError> {
        if program.len() > ROM_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: ROM_SIZE,
            });
        }

        self.words.fill(Word16::ZERO);
        self.words[..program.len()].copy_from_slice(program);
        self.loaded = program.len();
        Ok(())
    }

    /// Fetch the instruction at a PC value. Bits above bit 14 are ignored.
    #[inline]
    pub fn fetch(&self, pc: u16) -> Word16 {
        self.words[(pc & ADDRESS_MASK) as usize]
    }

    /// Number of words in the loaded program.
    pub fn program_len(&self) -> usize {
        self.loaded
    }
}

impl Default for Rom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Rom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rom")
            .field("program_len", &self.loaded)
            .field("capacity", &ROM_SIZE)
            .finish()
    }
}

/// Address decoder in front of RAM, screen and keyboard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryController {
    pub ram: Ram,
    pub screen: Screen,
    keyboard: Word16,
    unmapped: UnmappedPolicy,
}

impl MemoryController {
    pub fn new(unmapped: UnmappedPolicy) -> Self {
        Self {
            ram: Ram::new(RAM_SIZE),
            screen: Screen::new(),
            keyboard: Word16::ZERO,
            unmapped,
        }
    }

    /// Combinational read of the addressed word.
    pub fn read(&self, address: u16) -> Result<Word16, MemoryError> {
        match Region::decode(address) {
            Region::Ram(index) => Ok(self.ram.read(index)),
            Region::Screen(offset) => Ok(self.screen.read(offset)),
            Region::Keyboard => Ok(self.keyboard),
            Region::Unmapped(addr) => match self.unmapped {
                UnmappedPolicy::Ignore => {
                    debug!("read from unmapped address {:#06x}", addr);
                    Ok(Word16::ZERO)
                }
                UnmappedPolicy::Fault => Err(MemoryError::UnmappedAccess(addr)),
            },
        }
    }

    /// Clock edge: commit `value` at `address` if `load` is asserted.
    /// Writes to the keyboard register are ignored.
    pub fn write(&mut self, address: u16, value: Word16, load: bool) -> Result<(), MemoryError> {
        if !load {
            return Ok(());
        }

        match Region::decode(address) {
            Region::Ram(index) => self.ram.write(index, value),
            Region::Screen(offset) => self.screen.write(offset, value),
            Region::Keyboard => {}
            Region::Unmapped(addr) => match self.unmapped {
                UnmappedPolicy::Ignore => {
                    debug!("dropped write of {} to unmapped address {:#06x}", value.to_i16(), addr);
                }
                UnmappedPolicy::Fault => return Err(MemoryError::UnmappedAccess(addr)),
            },
        }
        Ok(())
    }

    /// The key currently pressed, 0 for none.
    pub fn keyboard(&self) -> Word16 {
        self.keyboard
    }

    /// Driven by the outside world, never by the CPU.
    pub fn set_keyboard(&mut self, key: Word16) {
        self.keyboard = key;
    }
}

impl Default for MemoryController {
    fn default() -> Self {
        Self::new(UnmappedPolicy::default())
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside the RAM and screen ranges.
    #[error("address {0:#06x} out of range for RAM/screen access (0x0000-0x5fff)")]
    AddressOutOfRange(u16),

    /// Program is too large to fit in ROM.
    #[error("program size {size} exceeds ROM capacity {available}")]
    ProgramTooLarge { size: usize, available: usize },

    /// Access to 0x6001..=0x7FFF under [`UnmappedPolicy::Fault`].
    #[error("access to unmapped address {0:#06x}")]
    UnmappedAccess(u16),
}
