//! Destinations for generated instructions
//!
//! The generator never prints. It hands each [`Instruction`] to an
//! [`InstructionSink`], which either collects it in memory or streams the
//! rendered line to a writer.

use patune_core::{Instruction, Result};
use std::io::Write;

/// Append-only consumer of generated instructions
pub trait InstructionSink {
    /// Accept the next instruction in program order
    fn emit(&mut self, instruction: Instruction) -> Result<()>;
}

impl InstructionSink for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) -> Result<()> {
        self.push(instruction);
        Ok(())
    }
}

/// Streams instructions as newline-terminated G-code lines
pub struct GcodeWriter<W: Write> {
    writer: W,
    lines_written: usize,
}

impl<W: Write> GcodeWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> InstructionSink for GcodeWriter<W> {
    fn emit(&mut self, instruction: Instruction) -> Result<()> {
        writeln!(self.writer, "{}", instruction)?;
        self.lines_written += 1;
        Ok(())
    }
}

/// Render a collected program as G-code text, one line per instruction
pub fn render(instructions: &[Instruction]) -> String {
    let mut gcode = String::new();
    for instruction in instructions {
        gcode.push_str(&instruction.to_string());
        gcode.push('\n');
    }
    gcode
}
