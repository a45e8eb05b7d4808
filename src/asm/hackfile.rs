//! `.hack` program files.
//!
//! The translator's output format is plain text:
//! - One instruction per line, as 16 `0`/`1` characters, MSB first
//! - Lines starting with `//` are comments
//! - Blank lines are ignored
//! - Anything after the first whitespace on a line is ignored

use crate::cpu::memory::ROM_SIZE;
use crate::word::Word16;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use thiserror::Error;

/// A loaded program image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HackFile {
    /// The program instructions.
    pub instructions: Vec<Word16>,
    /// Source line number (1-based) of each instruction.
    pub source_lines: Vec<usize>,
}

impl HackFile {
    /// Create a new empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instruction.
    pub fn push(&mut self, instr: Word16, line: usize) {
        self.instructions.push(instr);
        self.source_lines.push(line);
    }

    /// Source line of the instruction at a ROM address.
    pub fn source_line(&self, address: u16) -> Option<usize> {
        self.source_lines.get(address as usize).copied()
    }

    /// Get the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Parse `.hack` text from any reader.
pub fn read_hack<R: Read>(reader: R) -> Result<HackFile, HackFileError> {
    let reader = BufReader::new(reader);
    let mut image = HackFile::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| HackFileError::IoError(e.to_string()))?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let bits = trimmed.split_whitespace().next().unwrap_or_default();
        let word = Word16::parse_binary(bits).map_err(|e| HackFileError::ParseError {
            line: line_num + 1,
            message: e.to_string(),
        })?;

        if image.len() == ROM_SIZE {
            return Err(HackFileError::TooLarge { limit: ROM_SIZE });
        }
        image.push(word, line_num + 1);
    }

    Ok(image)
}

/// Parse `.hack` text held in memory.
pub fn parse_hack(source: &str) -> Result<HackFile, HackFileError> {
    read_hack(source.as_bytes())
}

/// Load a `.hack` file from disk.
pub fn load_hack<P: AsRef<Path>>(path: P) -> Result<HackFile, HackFileError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| HackFileError::IoError(e.to_string()))?;
    read_hack(file)
}

/// Write instructions as `.hack` text.
pub fn write_hack<W: Write>(mut writer: W, instructions: &[Word16]) -> Result<(), HackFileError> {
    for instr in instructions {
        writeln!(writer, "{}", instr).map_err(|e| HackFileError::IoError(e.to_string()))?;
    }
    Ok(())
}

/// Save instructions to a `.hack` file on disk.
pub fn save_hack<P: AsRef<Path>>(path: P, instructions: &[Word16]) -> Result<(), HackFileError> {
    let file = std::fs::File::create(path.as_ref())
        .map_err(|e| HackFileError::IoError(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_hack(&mut writer, instructions)?;
    writer.flush().map_err(|e| HackFileError::IoError(e.to_string()))
}

/// Errors that can occur reading or writing `.hack` files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HackFileError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("program exceeds the {limit}-word ROM")]
    TooLarge { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program() {
        let source = "\
// Computes D = 21
0000000000010101

1110110000010000   trailing notes
";
        let image = parse_hack(source).unwrap();
        assert_eq!(image.len(), 2);
        assert_eq!(image.instructions[0].bits(), 21);
        assert_eq!(image.instructions[1].bits(), 0b1110_1100_0001_0000);
        assert_eq!(image.source_lines, vec![2, 4]);
        assert_eq!(image.source_line(1), Some(4));
        assert_eq!(image.source_line(2), None);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_hack("0000000000000000\n000000000000001\n").unwrap_err();
        assert_eq!(
            err,
            HackFileError::ParseError {
                line: 2,
                message: "expected 16 bits, got 15".into(),
            }
        );

        let err = parse_hack("@21\n").unwrap_err();
        assert!(matches!(err, HackFileError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_rejects_oversized_image() {
        let source = "0000000000000000\n".repeat(ROM_SIZE + 1);
        assert_eq!(parse_hack(&source), Err(HackFileError::TooLarge { limit: ROM_SIZE }));
    }

    #[test]
    fn test_write_then_parse() {
        let words = [Word16::new(21), Word16::new(0xEC10), Word16::ONES];
        let mut buffer = Vec::new();
        write_hack(&mut buffer, &words).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().next(), Some("0000000000010101"));
        assert_eq!(parse_hack(&text).unwrap().instructions, words);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("hack-emu-{}.hack", std::process::id()));
        let words = [Word16::new(2), Word16::new(0b1110_1010_1000_0111)];
        save_hack(&path, &words).unwrap();

        let image = load_hack(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(image.instructions, words);
        assert_eq!(image.source_lines, vec![1, 2]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_full_disk() {
        let err = save_hack("/dev/full", &[Word16::new(21)]).unwrap_err();
        assert!(matches!(err, HackFileError::IoError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_hack("/nonexistent/prog.hack").unwrap_err();
        assert!(matches!(err, HackFileError::IoError(_)));
    }
}
